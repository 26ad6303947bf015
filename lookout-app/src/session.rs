//! The interactive search-and-open loop.
//!
//! Every failure inside the loop is reported on the console and the loop
//! carries on; only I/O errors on the console itself end the session early.
use crate::command::{QueryInput, Selection, parse_query_input, parse_selection};
use lookout_common::LookoutError;
use lookout_web::render::write_results;
use lookout_web::{Query, ResultSet, SearchBackend, Viewer};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const QUERY_PROMPT: &str = "Enter search query (or 'quit' to exit): ";
const INVALID_NUMBER: &str = "Invalid result number";
const NOT_A_NUMBER: &str = "Please enter a valid number";

pub struct Session<'a, B: ?Sized, V: ?Sized> {
    backend: &'a B,
    viewer: &'a V,
}

impl<'a, B, V> Session<'a, B, V>
where
    B: SearchBackend + ?Sized,
    V: Viewer + ?Sized,
{
    pub fn new(backend: &'a B, viewer: &'a V) -> Self {
        Self { backend, viewer }
    }

    /// Run until the user quits or input ends.
    pub async fn run<R, W>(&self, mut input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.write_banner(out)?;

        while let Some(line) = prompt(&mut input, out, QUERY_PROMPT).await? {
            let raw = match parse_query_input(&line) {
                QueryInput::Quit => break,
                QueryInput::Search(raw) => raw,
            };

            let Some(results) = self.search(&raw, out).await? else {
                continue;
            };
            write_results(out, &results)?;
            if results.is_empty() {
                continue;
            }
            self.choose(&results, &mut input, out).await?;
        }

        tracing::info!("session.ended");
        Ok(())
    }

    fn write_banner<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "\n{} Browser Controls:",
            self.viewer.name().to_uppercase()
        )?;
        writeln!(out, "- Use arrow keys to navigate")?;
        writeln!(out, "- Press Q to quit and return to search")?;
        writeln!(out, "- Press H for help with more commands")
    }

    /// `Ok(None)` means the failure was already reported to the user.
    async fn search<W: Write>(&self, raw: &str, out: &mut W) -> io::Result<Option<ResultSet>> {
        let outcome = match Query::parse(raw) {
            Ok(query) => {
                tracing::debug!(backend = self.backend.name(), "session.search");
                self.backend.search(&query).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(results) => Ok(Some(results)),
            Err(e) => {
                tracing::warn!(error = %e, "session.search_failed");
                writeln!(out, "{}", console_message(&e))?;
                Ok(None)
            }
        }
    }

    async fn choose<R, W>(&self, results: &ResultSet, input: &mut R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let selection_prompt = format!(
            "Enter result number to open in {} (or 'back' for new search): ",
            self.viewer.name()
        );

        while let Some(line) = prompt(input, out, &selection_prompt).await? {
            match parse_selection(&line, results.len()) {
                Selection::Back => break,
                Selection::Open(number) => {
                    let Some(result) = results.numbered(number) else {
                        writeln!(out, "{INVALID_NUMBER}")?;
                        continue;
                    };
                    if let Err(e) = self.viewer.open(&result.link).await {
                        writeln!(out, "{}", console_message(&e))?;
                        writeln!(out, "URL: {}", result.link)?;
                    }
                }
                Selection::OutOfRange(n) => {
                    tracing::debug!(selected = %n, available = results.len(), "session.out_of_range");
                    writeln!(out, "{INVALID_NUMBER}")?;
                }
                Selection::NotANumber(raw) => {
                    tracing::debug!(input = %raw, "session.not_a_number");
                    writeln!(out, "{NOT_A_NUMBER}")?;
                }
            }
        }
        Ok(())
    }
}

/// Console wording for each failure kind.
fn console_message(err: &LookoutError) -> String {
    match err {
        LookoutError::InvalidQuery(msg) | LookoutError::Config(msg) => format!("Error: {msg}"),
        LookoutError::Timeout => "Request timed out".to_string(),
        LookoutError::Request(msg) => format!("Request error: {msg}"),
        LookoutError::Viewer(msg) => format!("Error opening URL: {msg}"),
    }
}

/// Print `text` on a fresh line and read one line of input.
///
/// Returns `None` at end of input; the trailing newline is stripped.
/// Bytes that are not UTF-8 are replaced rather than treated as an error.
async fn prompt<R, W>(input: &mut R, out: &mut W, text: &str) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "\n{text}")?;
    out.flush()?;

    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf).await? == 0 {
        writeln!(out)?;
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lookout_web::SearchResult;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Outcome {
        Results(ResultSet),
        Timeout,
        Fail(&'static str),
    }

    struct FakeBackend {
        outcome: Outcome,
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for FakeBackend {
        async fn search(&self, query: &Query) -> lookout_common::Result<ResultSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            match &self.outcome {
                Outcome::Results(set) => Ok(set.clone()),
                Outcome::Timeout => Err(LookoutError::Timeout),
                Outcome::Fail(msg) => Err(LookoutError::Request(msg.to_string())),
            }
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    #[derive(Default)]
    struct FakeViewer {
        fail: bool,
        opened: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Viewer for FakeViewer {
        async fn open(&self, url: &str) -> lookout_common::Result<()> {
            if self.fail {
                return Err(LookoutError::Viewer("No such file or directory".into()));
            }
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }

        fn name(&self) -> &str {
            "w3m"
        }
    }

    fn three_results() -> ResultSet {
        ResultSet::new(["alpha", "beta", "gamma"].map(|t| SearchResult {
            title: t.to_string(),
            link: format!("https://{t}.example/"),
            snippet: Some(format!("about {t}")),
        }))
    }

    async fn drive(backend: &FakeBackend, viewer: &FakeViewer, input: &str) -> String {
        drive_bytes(backend, viewer, input.as_bytes()).await
    }

    async fn drive_bytes(backend: &FakeBackend, viewer: &FakeViewer, input: &[u8]) -> String {
        let mut out = Vec::new();
        Session::new(backend, viewer)
            .run(input, &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn blank_query_is_rejected_without_searching() {
        let backend = FakeBackend::new(Outcome::Results(three_results()));
        let viewer = FakeViewer::default();

        let out = drive(&backend, &viewer, "   \nquit\n").await;

        assert!(out.contains("Error: Search query cannot be empty"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn banner_names_the_viewer() {
        let backend = FakeBackend::new(Outcome::Results(ResultSet::default()));
        let viewer = FakeViewer::default();

        let out = drive(&backend, &viewer, "QUIT\n").await;

        assert!(out.starts_with("\nW3M Browser Controls:\n"));
        assert_eq!(out.matches(QUERY_PROMPT).count(), 1);
    }

    #[tokio::test]
    async fn results_are_listed_in_order_and_opened_by_number() {
        let backend = FakeBackend::new(Outcome::Results(three_results()));
        let viewer = FakeViewer::default();

        let out = drive(&backend, &viewer, "  greek letters \n2\nback\nquit\n").await;

        let a = out.find("1. alpha").unwrap();
        let b = out.find("2. beta").unwrap();
        let c = out.find("3. gamma").unwrap();
        assert!(a < b && b < c);
        assert_eq!(out.matches("URL: https://").count(), 3);
        assert_eq!(*backend.queries.lock().unwrap(), vec!["greek letters"]);
        assert_eq!(*viewer.opened.lock().unwrap(), vec!["https://beta.example/"]);
        assert!(out.contains("Enter result number to open in w3m (or 'back' for new search): "));
    }

    #[tokio::test]
    async fn bad_selections_print_guidance_and_keep_going() {
        let backend = FakeBackend::new(Outcome::Results(three_results()));
        let viewer = FakeViewer::default();

        let out = drive(&backend, &viewer, "rust\nabc\n7\n0\n-2\n3\nBack\nquit\n").await;

        assert_eq!(out.matches(NOT_A_NUMBER).count(), 1);
        assert_eq!(out.matches(INVALID_NUMBER).count(), 3);
        assert_eq!(*viewer.opened.lock().unwrap(), vec!["https://gamma.example/"]);
    }

    #[tokio::test]
    async fn empty_results_return_to_query_prompt() {
        let backend = FakeBackend::new(Outcome::Results(ResultSet::default()));
        let viewer = FakeViewer::default();

        let out = drive(&backend, &viewer, "nothing here\nquit\n").await;

        assert!(out.contains("No results found"));
        assert!(!out.contains("Enter result number"));
        assert_eq!(out.matches(QUERY_PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn search_failures_are_reported_and_loop_continues() {
        let backend = FakeBackend::new(Outcome::Timeout);
        let viewer = FakeViewer::default();
        let out = drive(&backend, &viewer, "one\ntwo\nquit\n").await;
        assert_eq!(out.matches("Request timed out").count(), 2);

        let backend = FakeBackend::new(Outcome::Fail("server returned error 403"));
        let out = drive(&backend, &viewer, "one\nquit\n").await;
        assert!(out.contains("Request error: server returned error 403"));
    }

    #[tokio::test]
    async fn viewer_failure_shows_the_url() {
        let backend = FakeBackend::new(Outcome::Results(three_results()));
        let viewer = FakeViewer {
            fail: true,
            ..Default::default()
        };

        let out = drive(&backend, &viewer, "x\n1\nback\nquit\n").await;

        assert!(out.contains("Error opening URL: No such file or directory\nURL: https://alpha.example/"));
    }

    #[tokio::test]
    async fn invalid_utf8_lines_do_not_end_the_session() {
        let backend = FakeBackend::new(Outcome::Results(three_results()));
        let viewer = FakeViewer::default();

        let out = drive_bytes(&backend, &viewer, b"rust\n\xff\xfe\n2\nback\nquit\n").await;

        assert!(out.contains(NOT_A_NUMBER));
        assert_eq!(*viewer.opened.lock().unwrap(), vec!["https://beta.example/"]);

        let backend = FakeBackend::new(Outcome::Results(ResultSet::default()));
        let out = drive_bytes(&backend, &viewer, b"\xff\xfe\nrust\nquit\n").await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(backend.queries.lock().unwrap()[1], "rust");
        assert_eq!(out.matches(QUERY_PROMPT).count(), 3);
    }

    #[tokio::test]
    async fn oversized_numbers_are_out_of_range() {
        let backend = FakeBackend::new(Outcome::Results(three_results()));
        let viewer = FakeViewer::default();

        let out = drive(&backend, &viewer, "rust\n99999999999999999999\nback\nquit\n").await;

        assert_eq!(out.matches(INVALID_NUMBER).count(), 1);
        assert!(!out.contains(NOT_A_NUMBER));
    }

    #[tokio::test]
    async fn end_of_input_ends_the_session() {
        let backend = FakeBackend::new(Outcome::Results(three_results()));
        let viewer = FakeViewer::default();

        // EOF at the selection prompt, then again at the query prompt.
        let out = drive(&backend, &viewer, "x\n").await;

        assert!(out.contains("3. gamma"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }
}
