//! Producer/consumer demonstration of the bounded byte channel.
//!
//! A producer thread pushes a short message a few times, then closes
//! its write end. The main thread polls in non-blocking mode, telling
//! apart the three read outcomes: data, a transient empty channel
//! (WouldBlock), and end-of-stream.

use log::info;
use std::thread;
use std::time::Duration;
use xpipe::{pipe, ErrorKind, Mode};

const MESSAGE: &[u8] = b"hello,i am child";
const ROUNDS: usize = 5;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (mut writer, mut reader) = pipe(1024).expect("Failed to create channel");

    let producer = thread::spawn(move || {
        info!("i am the producer thread");
        for _ in 0..ROUNDS {
            let mut pending = MESSAGE;
            while !pending.is_empty() {
                let written = writer.write(pending).expect("Failed to write");
                pending = &pending[written..];
            }
            thread::sleep(Duration::from_millis(500));
        }
        info!("producer done, closing write end");
    });

    info!("i am the consumer thread");
    reader.set_mode(Mode::NonBlocking);

    loop {
        match reader.read_bytes(1024) {
            Ok(data) if data.is_empty() => {
                info!("end of stream, no producer remains");
                break;
            }
            Ok(data) => {
                info!("recv {} bytes: {}", data.len(), String::from_utf8_lossy(&data));
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                info!("nothing queued yet");
            }
            Err(err) => panic!("read failed: {err}"),
        }
        thread::sleep(Duration::from_millis(200));
    }

    producer.join().expect("Producer thread panicked");
}
