//! Stream typed records across a socket pair.
//!
//! Run with:
//!   cargo run --example pipe-roundtrip
//!
//! Set `BINPRIMS_LOG=debug` to see frame-level tracing on stderr.

use std::collections::BTreeMap;
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::thread;

use binprims::codec::containers::{btree_map, vec};
use binprims::codec::iso::{iso0, Iso};
use binprims::codec::prim::{Int, Str};
use binprims::codec::{OptionCodec, Triple};
use binprims::frame::{FrameReader, FrameWriter};
use binprims::shape::ShapeRegistry;
use binprims::Codec;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, PartialEq)]
struct Reading {
    sensor: String,
    samples: Vec<i64>,
    note: Option<String>,
}

enum ReadingIso {}

impl Iso<()> for ReadingIso {
    type Value = Reading;
    type Repr = (String, Vec<i64>, Option<String>);

    fn to_repr(value: &Reading) -> Self::Repr {
        (value.sensor.clone(), value.samples.clone(), value.note.clone())
    }

    fn of_repr((sensor, samples, note): Self::Repr) -> Reading {
        Reading {
            sensor,
            samples,
            note,
        }
    }
}

fn init_logging() {
    let level = match std::env::var("BINPRIMS_LOG").as_deref() {
        Ok("trace") => LevelFilter::TRACE,
        Ok("debug") => LevelFilter::DEBUG,
        Ok("info") => LevelFilter::INFO,
        _ => LevelFilter::WARN,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

#[cfg(not(unix))]
fn main() {
    eprintln!("pipe-roundtrip needs Unix domain sockets");
}

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let reading = iso0::<ReadingIso, _>(Triple(Str, vec(Int), OptionCodec(Str)));
    let batch = btree_map(Str, reading.clone());

    let mut registry = ShapeRegistry::new();
    let digest = registry.register("reading-batch", batch.shape())?;
    eprintln!("reading-batch digest {digest}");

    let (left, right) = UnixStream::pair()?;
    let sender = thread::spawn(move || -> Result<(), binprims::FrameError> {
        let mut writer = FrameWriter::new(left);
        for round in 0..3i64 {
            let mut readings = BTreeMap::new();
            for sensor in ["north", "south"] {
                readings.insert(
                    format!("{sensor}-{round}"),
                    Reading {
                        sensor: sensor.to_owned(),
                        samples: (0..round * 4).map(|n| n * 100 - 150).collect(),
                        note: (round == 2).then(|| "recalibrated".to_owned()),
                    },
                );
            }
            writer.write_value(&batch, &readings)?;
        }
        Ok(())
    });

    registry.check("reading-batch", &btree_map(Str, reading.clone()).shape().digest())?;
    let mut reader = FrameReader::new(right);
    let receive = btree_map(Str, reading);
    loop {
        match reader.read_value(&receive) {
            Ok(batch) => {
                for (key, value) in &batch {
                    eprintln!("{key}: {} samples, note {:?}", value.samples.len(), value.note);
                }
            }
            Err(e) if e.is_connection_closed() => break,
            Err(e) => return Err(e.into()),
        }
    }

    sender.join().map_err(|_| "sender thread panicked")??;
    Ok(())
}
