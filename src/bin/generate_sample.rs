use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    id: i64,
    mz: f64,
    rt: f64,
    area: f64,
}

/// A feature table in the shape of an MZmine / GNPS quantification table.
///
/// Roughly one in eight species is split into two features a few ppm and
/// a few seconds apart, the artefact the evaluator is meant to detect.
fn generate(rng: &mut SimpleRng, species: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    for _ in 0..species {
        // Compounds crowd the middle of the gradient.
        let rt = rng.gauss(9.0, 3.5).clamp(0.5, 20.0);
        let mz = rng.uniform(120.0, 1100.0) + 0.02 * rt * rt;
        let area = 10f64.powf(rng.uniform(4.0, 8.0));
        rows.push(Row { id: 0, mz, rt, area });

        if rng.next_f64() < 0.125 {
            let dmz = mz * rng.uniform(-8.0, 8.0) / 1_000_000.0;
            let drt = rng.uniform(-10.0, 10.0) / 60.0;
            rows.push(Row {
                id: 0,
                mz: mz + dmz,
                rt: rt + drt,
                area: area * rng.uniform(0.05, 0.5),
            });
        }
    }
    for (i, row) in rows.iter_mut().enumerate() {
        row.id = i as i64 + 1;
    }
    rows
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "row ID",
        "row m/z",
        "row retention time",
        "sample.mzML Peak area",
        "",
    ])?;
    for row in rows {
        writer.write_record([
            row.id.to_string(),
            format!("{:.4}", row.mz),
            format!("{:.4}", row.rt),
            format!("{:.1}", row.area),
            String::new(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("row ID", DataType::Int64, false),
        Field::new("row m/z", DataType::Float64, false),
        Field::new("row retention time", DataType::Float64, false),
        Field::new("sample.mzML Peak area", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.mz))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.rt))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.area))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 800);

    let csv_path = "sample_quant.csv";
    let parquet_path = "sample_quant.parquet";
    write_csv(csv_path, &rows)?;
    write_parquet(parquet_path, &rows)?;

    println!(
        "Wrote {} features to {csv_path} and {parquet_path}",
        rows.len()
    );
    Ok(())
}
