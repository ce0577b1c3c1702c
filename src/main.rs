use anyhow::Context;
use bibliotech_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load BiblioTech settings")?;
    bibliotech_telemetry::init(&settings.telemetry);

    bibliotech_app::app::serve(settings).await
}
