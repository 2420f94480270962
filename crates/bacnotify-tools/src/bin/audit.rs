use bacnotify_core::encoding::reader::Reader;
use bacnotify_core::services::audit_log_record::AuditLogRecord;
use bacnotify_tools::parse_hex;
use clap::Parser;

/// Decodes one or more hex-encoded Audit Log records.
#[derive(Parser, Debug)]
#[command(name = "bacnotify-audit")]
struct Args {
    hex: String,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let bytes = parse_hex(&args.hex)?;

    let mut r = Reader::new(&bytes);
    let mut records = Vec::new();
    while !r.is_empty() {
        match AuditLogRecord::decode(&mut r) {
            Ok(record) => records.push(record),
            Err(e) => {
                eprintln!("record {} failed to decode: {e}", records.len() + 1);
                std::process::exit(1);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{record:#?}");
        }
    }
    Ok(())
}
