use bacnotify_core::encoding::reader::Reader;
use bacnotify_core::services::event_notification::EventNotification;
use bacnotify_tools::parse_hex;
use clap::Parser;

/// Decodes a hex-encoded EventNotification.
#[derive(Parser, Debug)]
#[command(name = "bacnotify-decode")]
struct Args {
    /// Confirmed or unconfirmed request APDU, or the bare service body
    /// with `--body`.
    hex: String,
    /// Input starts at the service body instead of the APDU header.
    #[arg(long)]
    body: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let bytes = parse_hex(&args.hex)?;
    log::debug!("decoding {} bytes", bytes.len());

    let decoded = if args.body {
        let mut r = Reader::new(&bytes);
        let notification = EventNotification::decode(&mut r);
        if notification.is_ok() && !r.is_empty() {
            log::warn!("{} trailing bytes ignored", r.remaining());
        }
        notification.map(|notification| (None, notification))
    } else {
        EventNotification::decode_apdu(&bytes)
    };

    match decoded {
        Ok((invoke_id, notification)) => {
            if let Some(invoke_id) = invoke_id {
                println!("confirmed, invoke id {invoke_id}");
            }
            println!("{notification:#?}");
        }
        Err(e) => {
            eprintln!("decode failed: {e} ({:?})", e.failure());
            std::process::exit(1);
        }
    }
    Ok(())
}
