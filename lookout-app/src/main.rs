use anyhow::Result;
use lookout_common::observability::init_logging;
use lookout_config::{
    Credentials, DEFAULT_CONFIG_FILE, LookoutConfig, LookoutConfigLoader, load_dotenv,
};
use lookout_web::{GoogleSearch, TerminalViewer};
use session::Session;
use tokio::io::BufReader;

mod command;
mod session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1) .env first so both config and credentials see it (existing vars win)
    let dotenv = load_dotenv();

    // 2) Config (env wins over lookout.yaml)
    let cfg: LookoutConfig = LookoutConfigLoader::new()
        .with_optional_file(DEFAULT_CONFIG_FILE)
        .load()?;

    let log_path = init_logging(&cfg.log)?;
    match &dotenv {
        Ok(path) => tracing::info!(log = %log_path.display(), dotenv = ?path, "lookout.start"),
        Err(e) => tracing::warn!(log = %log_path.display(), error = %e, "dotenv.invalid"),
    }

    // 3) Credentials are required before the loop starts
    let credentials = Credentials::from_env()?;

    let backend = GoogleSearch::new(credentials, &cfg.search)?;
    let viewer = TerminalViewer::from_settings(&cfg.viewer);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    Session::new(&backend, &viewer).run(stdin, &mut stdout).await?;
    Ok(())
}
