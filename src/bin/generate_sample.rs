use std::fs;
use std::io;

const SENSORS: usize = 3;
const SCANS: usize = 600;
const HBM_PREAMBLE_LINES: usize = 38;

/// Thermocouple reading during a ramp-and-soak oven profile.
fn oven_profile(t: f64, soak: f64, ramp_secs: f64) -> f64 {
    let ambient = 22.0;
    if t < ramp_secs {
        ambient + (soak - ambient) * t / ramp_secs
    } else {
        soak
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Agilent 34972A raw export: 8 metadata lines, one line per channel,
/// then `Scan,Time,<ch>,Alarm <ch>,…` rows.  Written as UTF-16LE.
fn agilent_raw(rng: &mut SimpleRng) -> String {
    let soaks = [350.0, 600.0, 900.0];
    let mut lines = vec![
        "Name,Oven profile".to_string(),
        "Owner,lab".to_string(),
        "Comments,generated sample".to_string(),
        "Acquisition Date,4/2/2020 09:00:00".to_string(),
        "Instrument,34972A,MY00000000".to_string(),
        format!("Total Sweeps,{SCANS}"),
        format!("Total Channels,{SENSORS}"),
        "Channel,Name,Function,Range,Resolution,Integration,Delay".to_string(),
    ];
    for ch in 0..SENSORS {
        lines.push(format!("{},TC{},Temp (Type K),,,,", 101 + ch, ch + 1));
    }

    let mut header = vec!["Scan".to_string(), "Time".to_string()];
    for ch in 0..SENSORS {
        header.push(format!("{} (C)", 101 + ch));
        header.push(format!("Alarm {}", 101 + ch));
    }
    lines.push(header.join(","));

    for scan in 0..SCANS {
        let secs = 9 * 3600 + scan;
        let mut row = vec![
            (scan + 1).to_string(),
            format!(
                "4/2/2020 {:02}:{:02}:{:02}:{:03}",
                secs / 3600,
                (secs / 60) % 60,
                secs % 60,
                0
            ),
        ];
        for (ch, soak) in soaks.iter().enumerate().take(SENSORS) {
            let reading = oven_profile(scan as f64, *soak, 300.0) + rng.gauss(0.0, 1.5);
            row.push(format!("{reading:+.6E}"));
            row.push(if ch == 2 && scan % 97 == 0 { "1" } else { "0" }.to_string());
        }
        lines.push(row.join(","));
    }
    lines.join("\r\n") + "\r\n"
}

/// HBM MX403B raw export: 38 preamble lines, whitespace columns, and a
/// status column that is only written on some rows.
fn hbm_raw(rng: &mut SimpleRng) -> String {
    let mut text = String::new();
    for i in 0..HBM_PREAMBLE_LINES {
        text.push_str(&format!("# catman export header line {}\n", i + 1));
    }
    text.push_str("Time  Strain  Load  Status\n");
    for i in 0..SCANS {
        let t = i as f64 * 0.1;
        let strain = 0.002 * t + rng.gauss(0.0, 0.0005);
        let load = 1.5 * t + rng.gauss(0.0, 0.2);
        text.push_str(&format!("{t:.1}  {strain:.5}  {load:.3}"));
        if i % 10 == 0 {
            text.push_str("  OK");
        }
        text.push('\n');
    }
    text
}

fn main() -> io::Result<()> {
    let mut rng = SimpleRng::new(42);

    let agilent_path = "sample_agilent_raw.csv";
    let mut bytes = vec![0xFF, 0xFE];
    for unit in agilent_raw(&mut rng).encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(agilent_path, bytes)?;

    let hbm_path = "sample_hbm_raw.txt";
    fs::write(hbm_path, hbm_raw(&mut rng))?;

    println!(
        "Wrote {SCANS} scans of {SENSORS} sensors to {agilent_path} and {SCANS} rows to {hbm_path}"
    );
    Ok(())
}
