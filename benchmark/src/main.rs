use midly_wire::{
    serialize, serialize_with_running_status, MidiMessage, MidiStream, SystemCommon,
    SystemRealtime,
};
use std::{env, time::Instant};

const STREAM_LEN: usize = 20_000;

const STREAMS: &[(&str, fn() -> Vec<u8>)] = &[
    ("notes", gen_notes),
    ("running-status", gen_running_status),
    ("sysex", gen_sysex),
    ("realtime", gen_realtime),
];

const PARSERS: &[(&str, fn(&[u8]) -> Result<usize, String>)] = &[
    ("midly_wire", parse_wire),
    ("midly_wire-feed", feed_wire),
    ("midly", parse_midly),
];

fn parse_wire(bytes: &[u8]) -> Result<usize, String> {
    let mut stream = MidiStream::new();
    let msgs = stream.parse(bytes).map_err(|err| format!("{}", err))?;
    Ok(msgs.len())
}

fn feed_wire(bytes: &[u8]) -> Result<usize, String> {
    let mut stream = MidiStream::new();
    let mut count = 0;
    let mut first_err = None;
    stream.feed(bytes, |ev| match ev {
        Ok(_) => count += 1,
        Err(err) => {
            first_err.get_or_insert(err);
        }
    });
    match first_err {
        Some(err) => Err(format!("{}", err)),
        None => Ok(count),
    }
}

fn parse_midly(bytes: &[u8]) -> Result<usize, String> {
    let mut stream: midly::stream::MidiStream = midly::stream::MidiStream::new();
    let mut count = 0;
    stream.feed(bytes, |_ev| count += 1);
    Ok(count)
}

/// Deterministic xorshift, so every run parses the same bytes.
struct Rng(u32);
impl Rng {
    fn next(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }
    fn u7(&mut self) -> u8 {
        (self.next() & 0x7F) as u8
    }
}

fn random_channel_msg(rng: &mut Rng) -> MidiMessage {
    let channel = (rng.next() & 0xF) as u8;
    match rng.next() % 7 {
        0 => MidiMessage::note_off(channel, rng.u7(), rng.u7()),
        1 => MidiMessage::note_on(channel, rng.u7(), rng.u7()),
        2 => MidiMessage::poly_pressure(channel, rng.u7(), rng.u7()),
        3 => MidiMessage::controller(channel, rng.u7(), rng.u7()),
        4 => MidiMessage::program_change(channel, rng.u7()),
        5 => MidiMessage::channel_pressure(channel, rng.u7()),
        _ => MidiMessage::pitch_bend(channel, (rng.next() & 0x3FFF) as u16),
    }
}

fn gen_notes() -> Vec<u8> {
    let mut rng = Rng(0x2545_F491);
    let msgs = (0..STREAM_LEN)
        .map(|_| random_channel_msg(&mut rng))
        .collect::<Vec<_>>();
    serialize(&msgs)
}

fn gen_running_status() -> Vec<u8> {
    let mut rng = Rng(0x9E37_79B9);
    let msgs = (0..STREAM_LEN)
        .map(|_| MidiMessage::note_on(3, rng.u7(), rng.u7()))
        .collect::<Vec<_>>();
    serialize_with_running_status(&msgs)
}

fn gen_sysex() -> Vec<u8> {
    let mut rng = Rng(0x1234_5678);
    let msgs = (0..STREAM_LEN / 16)
        .map(|_| {
            let len = (rng.next() % 512) as usize;
            let data = (0..len).map(|_| rng.u7()).collect::<Vec<_>>();
            MidiMessage::sysex(&data)
        })
        .collect::<Vec<_>>();
    serialize(&msgs)
}

fn gen_realtime() -> Vec<u8> {
    let mut rng = Rng(0xDEAD_BEEF);
    let mut bytes = Vec::new();
    for _ in 0..STREAM_LEN {
        let msg = match rng.next() % 4 {
            0 => MidiMessage::Common(SystemCommon::SongPosition((rng.next() & 0x3FFF) as u16)),
            _ => random_channel_msg(&mut rng),
        };
        for byte in serialize(&[msg]) {
            bytes.push(byte);
            if rng.next() % 3 == 0 {
                bytes.push(SystemRealtime::TimingClock.status_byte());
            }
        }
    }
    bytes
}

fn use_parser(parse: fn(&[u8]) -> Result<usize, String>, bytes: &[u8]) -> Result<(), String> {
    let round = |num: f64| (num * 100.0).round() / 100.0;

    let runtime = || -> Result<_, String> {
        let start = Instant::now();
        let out = parse(bytes)?;
        let time = round((start.elapsed().as_micros() as f64) / 1000.0);
        Ok((out, time))
    };

    let (msg_count, cold_time) = runtime()?;
    let runtime = || -> Result<_, String> {
        let (out, time) = runtime()?;
        assert_eq!(out, msg_count, "parser is not consistent with message counts");
        Ok(time)
    };

    let iters = (2000.0 / cold_time.max(0.01)).floor() as u64 + 1;
    let mut total_time = 0.0;
    let mut max_time = cold_time;
    let mut min_time = cold_time;
    for _ in 0..iters {
        let time = runtime()?;
        total_time += time;
        max_time = max_time.max(time);
        min_time = min_time.min(time);
    }
    let avg_time = round(total_time / (iters as f64));

    eprintln!(
        "{} messages in {} iters / min {} / avg {} / max {}",
        msg_count, iters, min_time, avg_time, max_time
    );

    Ok(())
}

fn main() {
    // Surface the parser's warnings alongside the timings
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let stream_filter = env::args().nth(1).unwrap_or_default().to_lowercase();
    let parser_filter = env::args().nth(2).unwrap_or_default().to_lowercase();

    let parsers = PARSERS
        .iter()
        .filter(|(name, _)| name.contains(&parser_filter))
        .collect::<Vec<_>>();
    if parsers.is_empty() {
        eprintln!("no parsers match the pattern \"{}\"", parser_filter);
        eprint!("available parsers: ");
        for (i, (name, _)) in PARSERS.iter().enumerate() {
            if i > 0 {
                eprint!(", ");
            }
            eprint!("{}", name);
        }
        eprintln!();
    }

    let streams = STREAMS
        .iter()
        .filter(|(name, _)| name.contains(&stream_filter))
        .collect::<Vec<_>>();
    if streams.is_empty() {
        eprintln!("no streams match the pattern \"{}\"", stream_filter);
        eprintln!("available streams:");
        for (name, _) in STREAMS.iter() {
            eprintln!("  {}", name);
        }
        return;
    }
    for &(name, generate) in streams {
        let bytes = generate();
        eprintln!("parsing stream \"{}\" ({} KB)", name, bytes.len() / 1024);
        for &(parser, parse) in parsers.iter() {
            eprint!("  {}: ", parser);
            if let Err(err) = use_parser(*parse, &bytes) {
                eprintln!("parse error: {}", err);
            }
        }
        eprintln!();
    }
}
