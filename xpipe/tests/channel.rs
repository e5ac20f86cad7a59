//! Channel semantics tests: ordering, partial writes, end-of-stream,
//! broken-channel, blocking wakeups, and handle lifecycle.

use std::thread;
use std::time::{Duration, Instant};

use xpipe::{pipe, ChannelState, ErrorKind, Mode};

#[test]
fn test_single_writer_order_preserved() {
    let (mut writer, mut reader) = pipe(64).unwrap();

    assert_eq!(writer.write(b"abc").unwrap(), 3);
    assert_eq!(writer.write(b"def").unwrap(), 3);
    assert_eq!(writer.write(b"gh").unwrap(), 2);

    let data = reader.read_bytes(64).unwrap();
    assert_eq!(data, b"abcdefgh");
}

#[test]
fn test_partial_write_at_capacity() {
    // 17 bytes into a 16-byte channel: first call accepts 16, the
    // remainder goes through on a second call once space exists.
    let (mut writer, mut reader) = pipe(16).unwrap();

    let msg = b"hello,i am child!";
    assert_eq!(msg.len(), 17);

    let written = writer.write(msg).unwrap();
    assert_eq!(written, 16);

    writer.set_mode(Mode::NonBlocking);
    let err = writer.write(&msg[written..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WouldBlock);

    assert_eq!(reader.read_bytes(16).unwrap(), &msg[..16]);
    assert_eq!(writer.write(&msg[written..]).unwrap(), 1);
    assert_eq!(reader.read_bytes(16).unwrap(), b"!");
}

#[test]
fn test_drain_then_end_of_stream() {
    let (mut writer, mut reader) = pipe(64).unwrap();

    writer.write(b"residue").unwrap();
    writer.close().unwrap();

    // Buffered bytes still come out after the close, in order.
    assert_eq!(reader.read_bytes(3).unwrap(), b"res");
    assert_eq!(reader.read_bytes(64).unwrap(), b"idue");

    // Only then does the channel report end-of-stream, repeatedly.
    assert!(reader.read_bytes(64).unwrap().is_empty());
    assert!(reader.read_bytes(64).unwrap().is_empty());
}

#[test]
fn test_immediate_close_is_end_of_stream() {
    let (mut writer, mut reader) = pipe(1024).unwrap();
    writer.close().unwrap();

    // Blocking mode, yet the call must return at once: empty result,
    // not WouldBlock.
    let data = reader.read_bytes(1024).unwrap();
    assert!(data.is_empty());
}

#[test]
fn test_broken_channel_regardless_of_occupancy() {
    let (mut writer, mut reader) = pipe(64).unwrap();

    writer.write(b"buffered").unwrap();
    reader.close().unwrap();

    // Space is available, but with no readers the write still fails.
    let err = writer.write(b"more").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenChannel);
}

#[test]
fn test_write_to_closed_reader() {
    let (mut writer, reader) = pipe(1024).unwrap();
    drop(reader);

    let err = writer.write(b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenChannel);
}

#[test]
fn test_nonblocking_read_empty() {
    let (mut writer, mut reader) = pipe(64).unwrap();
    reader.set_mode(Mode::NonBlocking);

    let err = reader.read_bytes(64).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WouldBlock);

    // The failed read consumed nothing and the channel still works.
    writer.write(b"later").unwrap();
    assert_eq!(reader.read_bytes(64).unwrap(), b"later");
}

#[test]
fn test_nonblocking_write_full() {
    let (mut writer, mut reader) = pipe(4).unwrap();

    assert_eq!(writer.write(b"full").unwrap(), 4);
    writer.set_mode(Mode::NonBlocking);

    let err = writer.write(b"over").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WouldBlock);

    // The failed write left the buffer contents intact.
    assert_eq!(reader.read_bytes(8).unwrap(), b"full");
}

#[test]
fn test_duplicate_writer_delays_end_of_stream() {
    let (mut writer, mut reader) = pipe(64).unwrap();
    let mut dup = writer.duplicate().unwrap();

    reader.set_mode(Mode::NonBlocking);

    // One of two write ends closed: not end-of-stream yet.
    writer.close().unwrap();
    let err = reader.read_bytes(64).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WouldBlock);

    dup.write(b"still open").unwrap();
    assert_eq!(reader.read_bytes(64).unwrap(), b"still open");

    dup.close().unwrap();
    assert!(reader.read_bytes(64).unwrap().is_empty());
}

#[test]
fn test_duplicate_reader_delays_broken_channel() {
    let (mut writer, mut reader) = pipe(64).unwrap();
    let mut dup = reader.duplicate().unwrap();

    reader.close().unwrap();
    writer.write(b"ok").unwrap();
    assert_eq!(dup.read_bytes(64).unwrap(), b"ok");

    dup.close().unwrap();
    let err = writer.write(b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenChannel);
}

#[test]
fn test_blocking_read_woken_by_write() {
    let (mut writer, mut reader) = pipe(64).unwrap();

    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        writer.write(b"wakeup").unwrap();
    });

    // Blocks until the producer delivers.
    let data = reader.read_bytes(64).unwrap();
    assert_eq!(data, b"wakeup");
    producer.join().unwrap();
}

#[test]
fn test_blocking_write_woken_by_read() {
    let (mut writer, mut reader) = pipe(4).unwrap();
    writer.write(b"full").unwrap();

    let consumer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        assert_eq!(reader.read_bytes(2).unwrap(), b"fu");
        // Keep the read end alive until the writer is done.
        thread::sleep(Duration::from_millis(50));
    });

    // Blocks until the consumer frees two bytes.
    let written = writer.write(b"xy").unwrap();
    assert_eq!(written, 2);
    consumer.join().unwrap();
}

#[test]
fn test_blocking_read_woken_by_writer_close() {
    let (writer, mut reader) = pipe(64).unwrap();

    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        drop(writer);
    });

    // Pending blocking read observes end-of-stream on the close.
    let data = reader.read_bytes(64).unwrap();
    assert!(data.is_empty());
    producer.join().unwrap();
}

#[test]
fn test_blocking_write_woken_by_reader_close() {
    let (mut writer, reader) = pipe(4).unwrap();
    writer.write(b"full").unwrap();

    let consumer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        drop(reader);
    });

    let err = writer.write(b"stuck").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenChannel);
    consumer.join().unwrap();
}

#[test]
fn test_read_deadline_expires() {
    let (_writer, mut reader) = pipe(64).unwrap();

    let start = Instant::now();
    let deadline = start + Duration::from_millis(50);
    let err = reader.read_bytes_deadline(64, deadline).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WouldBlock);
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[test]
fn test_write_deadline_expires() {
    let (mut writer, _reader) = pipe(4).unwrap();
    writer.write(b"full").unwrap();

    let start = Instant::now();
    let deadline = start + Duration::from_millis(50);
    let err = writer.write_deadline(b"over", deadline).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WouldBlock);
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[test]
fn test_deadline_met_before_expiry() {
    let (mut writer, mut reader) = pipe(64).unwrap();

    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        writer.write(b"in time").unwrap();
    });

    let deadline = Instant::now() + Duration::from_secs(5);
    let data = reader.read_bytes_deadline(64, deadline).unwrap();
    assert_eq!(data, b"in time");
    producer.join().unwrap();
}

#[test]
fn test_double_close_reported() {
    let (mut writer, mut reader) = pipe(8).unwrap();

    writer.close().unwrap();
    assert_eq!(writer.close().unwrap_err().kind(), ErrorKind::DoubleClose);

    reader.close().unwrap();
    assert_eq!(reader.close().unwrap_err().kind(), ErrorKind::DoubleClose);
}

#[test]
fn test_closed_handle_rejected() {
    let (mut writer, mut reader) = pipe(8).unwrap();

    writer.close().unwrap();
    assert_eq!(writer.write(b"x").unwrap_err().kind(), ErrorKind::ClosedHandle);
    assert_eq!(writer.duplicate().unwrap_err().kind(), ErrorKind::ClosedHandle);

    reader.close().unwrap();
    assert_eq!(reader.read_bytes(8).unwrap_err().kind(), ErrorKind::ClosedHandle);
    assert_eq!(reader.duplicate().unwrap_err().kind(), ErrorKind::ClosedHandle);
}

#[test]
fn test_read_bytes_huge_limit() {
    // The limit bounds the result, not the allocation: even usize::MAX
    // is a valid limit on a small channel.
    let (mut writer, mut reader) = pipe(8).unwrap();
    writer.write(b"hi").unwrap();

    let data = reader.read_bytes(usize::MAX).unwrap();
    assert_eq!(data, b"hi");

    writer.close().unwrap();
    assert!(reader.read_bytes(usize::MAX).unwrap().is_empty());
}

#[test]
fn test_empty_write_to_closed_reader_is_broken() {
    let (mut writer, mut reader) = pipe(8).unwrap();
    reader.close().unwrap();

    // No readers means no write succeeds, not even a zero-length one.
    let err = writer.write(b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenChannel);
}

#[test]
fn test_empty_write_while_open() {
    let (mut writer, mut reader) = pipe(8).unwrap();

    assert_eq!(writer.write(b"").unwrap(), 0);

    // The zero-length write queued nothing.
    reader.set_mode(Mode::NonBlocking);
    assert_eq!(reader.read_bytes(8).unwrap_err().kind(), ErrorKind::WouldBlock);
}

#[test]
fn test_invalid_arguments() {
    assert_eq!(pipe(0).unwrap_err().kind(), ErrorKind::InvalidCapacity);

    let (_writer, mut reader) = pipe(8).unwrap();
    assert_eq!(reader.read_bytes(0).unwrap_err().kind(), ErrorKind::InvalidLimit);
}

#[test]
fn test_mode_is_per_handle() {
    let (writer, mut reader) = pipe(8).unwrap();
    let mut dup = reader.duplicate().unwrap();

    dup.set_mode(Mode::NonBlocking);
    assert_eq!(dup.mode(), Mode::NonBlocking);
    assert_eq!(reader.mode(), Mode::Blocking);

    // Only the handle the mode was set on fails fast.
    assert_eq!(dup.read_bytes(8).unwrap_err().kind(), ErrorKind::WouldBlock);
    drop(writer);
}

#[test]
fn test_state_transitions() {
    let (mut writer, mut reader) = pipe(8).unwrap();
    assert_eq!(reader.state(), ChannelState::Open);

    writer.close().unwrap();
    assert_eq!(reader.state(), ChannelState::WriteClosed);

    reader.close().unwrap();
    assert_eq!(reader.state(), ChannelState::FullyClosed);

    let (writer2, mut reader2) = pipe(8).unwrap();
    reader2.close().unwrap();
    assert_eq!(writer2.state(), ChannelState::ReadClosed);
}

#[test]
fn test_two_writers_interleave_whole_chunks() {
    // Cross-writer byte order is lock acquisition order; each write
    // lands as one contiguous run when it fits in free space.
    let (mut writer, mut reader) = pipe(1024).unwrap();
    let mut dup = writer.duplicate().unwrap();

    let a = thread::spawn(move || {
        for _ in 0..50 {
            assert_eq!(writer.write(b"aaaa").unwrap(), 4);
        }
        writer.close().unwrap();
    });
    let b = thread::spawn(move || {
        for _ in 0..50 {
            assert_eq!(dup.write(b"bbbb").unwrap(), 4);
        }
        dup.close().unwrap();
    });

    let mut all = Vec::new();
    loop {
        let chunk = reader.read_bytes(1024).unwrap();
        if chunk.is_empty() {
            break;
        }
        all.extend_from_slice(&chunk);
    }
    a.join().unwrap();
    b.join().unwrap();

    assert_eq!(all.len(), 400);
    assert_eq!(all.iter().filter(|&&c| c == b'a').count(), 200);
    assert_eq!(all.iter().filter(|&&c| c == b'b').count(), 200);
    for run in all.chunks(4) {
        assert!(run == b"aaaa" || run == b"bbbb");
    }
}
