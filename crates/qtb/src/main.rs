use std::sync::Arc;

use qtb_core::config::{Config, Transport};

mod console;

#[tokio::main]
async fn main() -> Result<(), qtb_core::Error> {
    qtb_core::logging::init("qtb")?;

    let cfg = Arc::new(Config::load()?);

    match cfg.transport {
        Transport::Telegram => qtb_telegram::router::run_polling(cfg)
            .await
            .map_err(|e| qtb_core::Error::External(format!("telegram bot failed: {e}")))?,
        Transport::Console => console::run(cfg).await?,
    }

    Ok(())
}
