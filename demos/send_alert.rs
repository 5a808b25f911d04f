//! Send one alert using configuration from `config/nexmo.*` and `NEXMO__*`
//! environment variables.
//!
//! ```sh
//! NEXMO__API_KEY=... NEXMO__API_SECRET=... NEXMO__TO=447700900000 \
//! NEXMO__TEXT="[source] failed in [stream]" \
//!     cargo run --example send_alert -- "Production errors" web-01
//! ```

use nexmo_alarm_callback::logging;
use nexmo_alarm_callback::prelude::*;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&LoggingConfig {
        level: "info".to_string(),
        format: "pretty".to_string(),
    })?;

    let mut args = std::env::args().skip(1);
    let stream = args.next().unwrap_or_else(|| "Demo stream".to_string());
    let mut context = DispatchContext::new(stream);
    if let Some(source) = args.next() {
        context = context.with_message(MessageSummary::new(source));
    }

    let mut callback = NexmoAlarmCallback::new();
    callback.initialize(Configuration::load()?)?;
    callback.check_configuration()?;
    info!(attributes = ?callback.attributes(), "configuration accepted");

    let report = callback.call(&context)?;
    for delivery in &report.delivered {
        println!("{} -> {}", delivery.recipient, delivery.message_id);
    }
    Ok(())
}
