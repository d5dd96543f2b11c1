use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Same row count as the public insurance dataset.
const ROWS: usize = 1338;
const REGIONS: [&str; 4] = ["southwest", "southeast", "northwest", "northeast"];

#[derive(Debug, Serialize)]
struct Row {
    age: i64,
    sex: &'static str,
    bmi: f64,
    children: i64,
    smoker: &'static str,
    region: &'static str,
    charges: f64,
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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_row(rng: &mut SimpleRng) -> Row {
    let age = rng.range(18, 64);
    let sex = if rng.next_f64() < 0.5 { "female" } else { "male" };
    let region = REGIONS[rng.range(0, 3) as usize];
    // The southeast skews heavier in the public data.
    let bmi_mean = if region == "southeast" { 33.4 } else { 29.8 };
    let bmi = (rng.gauss(bmi_mean, 6.0).clamp(16.0, 53.0) * 100.0).round() / 100.0;
    let children = match rng.next_f64() {
        p if p < 0.43 => 0,
        p if p < 0.67 => 1,
        p if p < 0.85 => 2,
        p if p < 0.97 => 3,
        _ => rng.range(4, 5),
    };
    let smoker = rng.next_f64() < 0.205;

    let mut charges = 260.0 * age as f64 - 2200.0 + 475.0 * children as f64;
    charges += 340.0 * (bmi - 30.0).max(-8.0);
    if smoker {
        charges += 23_800.0;
        if bmi >= 30.0 {
            charges += 19_000.0;
        }
    }
    charges += rng.gauss(0.0, 3_500.0).abs();
    let charges = (charges.max(1_121.0) * 1e4).round() / 1e4;

    Row {
        age,
        sex,
        bmi,
        children,
        smoker: if smoker { "yes" } else { "no" },
        region,
        charges,
    }
}

fn write_csv(path: &Path, rows: &[Row]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");
    for row in rows {
        writer.serialize(row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(path: &Path, rows: &[Row]) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Int64, false),
        Field::new("sex", DataType::Utf8, false),
        Field::new("bmi", DataType::Float64, false),
        Field::new("children", DataType::Int64, false),
        Field::new("smoker", DataType::Utf8, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("charges", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.age))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sex))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.bmi))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.children))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.smoker))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.region))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.charges))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let output = std::env::args().nth(1).unwrap_or_else(|| "insurance.csv".to_string());
    let output_path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let rows: Vec<Row> = (0..ROWS).map(|_| generate_row(&mut rng)).collect();

    match output_path.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(output_path, &rows),
        _ => write_csv(output_path, &rows),
    }

    let smokers = rows.iter().filter(|r| r.smoker == "yes").count();
    println!(
        "Wrote {} policyholders ({smokers} smokers) to {}",
        rows.len(),
        output_path.display()
    );
}
