//! Basic usage example demonstrating the bounded byte channel.
//!
//! This example shows how to:
//! - Create a channel and write through its write end
//! - Observe partial writes at capacity
//! - Switch a handle to non-blocking mode
//! - Distinguish WouldBlock from end-of-stream
//!
//! Run with: cargo run --example basic_usage

use xpipe::{pipe, ErrorKind, Mode};

fn main() {
    println!("=== XPipe Basic Usage Example ===\n");

    // Example 1: Write then read
    println!("1. Write then read:");
    let (mut writer, mut reader) = pipe(16).expect("create failed");
    let written = writer.write(b"hello").expect("write failed");
    let data = reader.read_bytes(16).expect("read failed");
    println!("   Wrote {} bytes, read back {:?}\n", written, String::from_utf8_lossy(&data));

    // Example 2: Partial write at capacity
    println!("2. Partial write:");
    let msg = b"hello,i am child!"; // 17 bytes, capacity is 16
    let written = writer.write(msg).expect("write failed");
    println!("   Offered {} bytes, channel accepted {}", msg.len(), written);
    let drained = reader.read_bytes(1024).expect("read failed");
    println!("   Drained {} bytes, 1 byte left to deliver\n", drained.len());
    writer.write(&msg[written..]).expect("write failed");
    reader.read_bytes(1024).expect("read failed");

    // Example 3: Non-blocking read on an empty channel
    println!("3. Non-blocking mode:");
    reader.set_mode(Mode::NonBlocking);
    match reader.read_bytes(16) {
        Err(err) if err.kind() == ErrorKind::WouldBlock => {
            println!("   Empty channel, writer still open: WouldBlock\n");
        }
        other => println!("   Unexpected outcome: {other:?}\n"),
    }

    // Example 4: End-of-stream
    println!("4. End-of-stream:");
    writer.close().expect("close failed");
    let data = reader.read_bytes(16).expect("read failed");
    println!("   Writer closed, read returned {} bytes: end of stream", data.len());
}
