#![cfg(unix)]

use std::collections::HashMap;
use std::io::Cursor;
use std::os::unix::net::UnixStream;
use std::thread;

use binprims::codec::containers::{hash_map, vec};
use binprims::codec::prim::{ByteString, Int, Str, U8};
use binprims::codec::Pair;
use binprims::frame::{
    dump, pull_fn, read_from_stream, FrameConfig, FrameError, FrameReader, FrameWriter, HEADER_SIZE,
};

#[test]
fn values_cross_a_socket_pair() {
    let (left, right) = UnixStream::pair().unwrap();
    let codec = hash_map(Str, vec(Int));

    let sender = thread::spawn(move || {
        let mut writer = FrameWriter::new(left);
        let codec = hash_map(Str, vec(Int));
        for round in 0..16i64 {
            let mut value = HashMap::new();
            value.insert(format!("round-{round}"), (0..round).collect::<Vec<_>>());
            value.insert("squares".to_owned(), (0..round).map(|n| n * n).collect());
            writer.write_value(&codec, &value).unwrap();
        }
    });

    let mut reader = FrameReader::new(right);
    for round in 0..16i64 {
        let value = reader.read_value(&codec).unwrap();
        assert_eq!(value[&format!("round-{round}")].len(), round as usize);
        assert_eq!(value["squares"].last().copied(), round.checked_sub(1).map(|n| n * n));
    }
    sender.join().unwrap();

    assert!(reader.read_value(&codec).unwrap_err().is_connection_closed());
}

#[test]
fn large_payload_survives_partial_socket_reads() {
    let (left, right) = UnixStream::pair().unwrap();
    let blob: Vec<u8> = (0..1_000_000u32).map(|n| (n % 251) as u8).collect();
    let expected = blob.clone();

    let sender = thread::spawn(move || {
        let mut writer = FrameWriter::new(left);
        writer.write_value(&ByteString, &blob).unwrap();
    });

    let mut reader = FrameReader::new(right);
    assert_eq!(reader.read_value(&ByteString).unwrap(), expected);
    sender.join().unwrap();
}

#[test]
fn reader_limit_stops_before_payload() {
    let (left, right) = UnixStream::pair().unwrap();
    let mut writer = FrameWriter::with_config(left, FrameConfig::unbounded());
    writer.write_value(&vec(U8), &vec![7; 4096]).unwrap();

    let mut reader = FrameReader::with_config(right, FrameConfig { max_size: Some(1024) });
    let err = reader.read_value(&vec(U8)).unwrap_err();
    assert!(matches!(
        err,
        FrameError::SizeLimitExceeded {
            size: 4099,
            max: 1024
        }
    ));
}

#[test]
fn pull_closure_reads_from_segmented_storage() {
    let codec = Pair(Str, Int);
    let value = ("segmented".to_owned(), -9_000_000_000);
    let wire = dump(&codec, &value, true).unwrap();

    // Serve the bytes out of fixed-size chunks, like pages of a mapped file.
    let chunks: Vec<&[u8]> = wire.chunks(5).collect();
    let mut cursor = 0usize;
    let mut source = pull_fn(|buf: &mut [u8], offset: usize, len: usize| {
        for slot in &mut buf[offset..offset + len] {
            let chunk = chunks.get(cursor / 5).ok_or(std::io::ErrorKind::UnexpectedEof)?;
            *slot = chunk[cursor % 5];
            cursor += 1;
        }
        Ok(())
    });

    assert_eq!(read_from_stream(&codec, &mut source, None).unwrap(), value);
}

#[test]
fn back_to_back_frames_in_one_buffer() {
    let mut wire = Vec::new();
    for word in ["a", "bc", "def"] {
        wire.extend_from_slice(&dump(&Str, &word.to_owned(), true).unwrap());
    }
    assert_eq!(wire.len(), 3 * HEADER_SIZE + 2 + 3 + 4);

    let mut cursor = Cursor::new(wire);
    let words: Vec<String> = (0..3)
        .map(|_| read_from_stream(&Str, &mut cursor, None).unwrap())
        .collect();
    assert_eq!(words, ["a", "bc", "def"]);
}
