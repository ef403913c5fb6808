mod api;
mod app;
mod components;
mod dom;

use learnlog_core::config::ClientConfig;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting learnlog page scripts"
  );

  let config = ClientConfig::load_embedded(
    include_str!("../assets/learnlog.toml")
  );
  app::start(config);
}
