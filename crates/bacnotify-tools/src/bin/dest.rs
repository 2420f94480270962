use bacnotify_core::encoding::{reader::Reader, Encode};
use bacnotify_core::services::destination::Destination;
use bacnotify_tools::{parse_hex, Hex};
use clap::Parser;

/// Converts a BACnetDestination between its ASCII form and its encoding.
#[derive(Parser, Debug)]
#[command(name = "bacnotify-dest")]
struct Args {
    /// ASCII destination, e.g.
    /// "(Recipient=Device(type=8,instance=15);Transitions=[to-normal])".
    #[arg(required_unless_present = "hex")]
    text: Option<String>,
    /// Decode encoded destination bytes instead.
    #[arg(long, conflicts_with = "text")]
    hex: Option<String>,
    /// Also print the destination as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let destination = match (args.hex, args.text) {
        (Some(hex), _) => {
            let bytes = parse_hex(&hex)?;
            let mut r = Reader::new(&bytes);
            let destination = Destination::decode(&mut r)?;
            if !r.is_empty() {
                log::warn!("{} trailing bytes ignored", r.remaining());
            }
            destination
        }
        (None, Some(text)) => match text.parse::<Destination>() {
            Ok(destination) => destination,
            Err(e) => {
                eprintln!("invalid destination: {e}");
                std::process::exit(1);
            }
        },
        (None, None) => return Err("either a destination or --hex is required".into()),
    };

    let mut buf = vec![0u8; destination.encoded_len()?];
    let len = destination.encode_into(Some(&mut buf))?;

    println!("{destination}");
    println!("{}", Hex(&buf[..len]));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&destination)?);
    }
    Ok(())
}
