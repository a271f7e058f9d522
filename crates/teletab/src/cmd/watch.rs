use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use teletab_frame::{normalize, FrameError, FrameReader, NormalizeConfig};
use teletab_store::{IndicatorStore, StalenessScale};
use teletab_transport::SerialLink;
use tracing::{debug, info};

use crate::cmd::{parse_duration, WatchArgs};
use crate::exit::{frame_error, transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{clear_screen, print_snapshot, OutputFormat};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    // Validate configuration before touching the port.
    let read_timeout = parse_duration(&args.read_timeout)?;
    let poll_interval = parse_duration(&args.poll_interval)?;
    let scale = match &args.staleness {
        Some(spec) => spec
            .parse::<StalenessScale>()
            .map_err(|err| CliError::new(USAGE, format!("invalid --staleness: {err}")))?,
        None => StalenessScale::default(),
    };
    let normalize_config = NormalizeConfig {
        unscaled_symbols: args.unscaled.clone(),
        substitution_trigger: args.substitution_trigger,
    };

    let mut link = SerialLink::open(&args.port, args.baud, read_timeout)
        .map_err(|err| transport_error("open failed", err))?;

    if args.request_start {
        link.request_start()
            .map_err(|err| transport_error("start request failed", err))?;
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut reader = FrameReader::new(link);
    let mut store = IndicatorStore::new();

    // The link is dropped (and the port closed) on every path out of
    // this loop, including errors.
    while running.load(Ordering::SeqCst) {
        let frames = match reader.poll_frames() {
            Ok(frames) => frames,
            Err(FrameError::Disconnected) => {
                info!("byte source disconnected");
                break;
            }
            Err(err) => return Err(frame_error("read failed", err)),
        };

        if !frames.is_empty() {
            debug!(frames = frames.len(), "decoded frames");
            let now = Instant::now();
            for frame in &frames {
                if let Some(reading) = normalize(frame, &normalize_config, now) {
                    store.update(reading);
                }
            }
        }

        if matches!(format, OutputFormat::Table | OutputFormat::Pretty) {
            clear_screen();
        }
        print_snapshot(&store.snapshot(Instant::now()), &scale, format);

        thread::sleep(poll_interval);
    }

    info!("watch loop stopped");
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
