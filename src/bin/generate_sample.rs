use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use shower_plot::Layout;

/// Write a synthetic shower table in one of the known layouts.
#[derive(Debug, Parser)]
struct Args {
    /// Column layout to write
    #[arg(value_enum, default_value_t = Layout::Species)]
    layout: Layout,

    /// Output path
    #[arg(default_value = "result.txt")]
    output: PathBuf,

    /// Depth step between rows (g/cm²)
    #[arg(long, default_value_t = 10.0)]
    step: f64,

    /// Number of rows
    #[arg(long, default_value_t = 100)]
    rows: usize,
}

/// Primary energy in eV.
const PRIMARY_ENERGY: f64 = 1e15;

/// Gaisser-Hillas longitudinal profile, floored at one particle so every
/// value stays plottable on a log axis.
fn gaisser_hillas(depth: f64, n_max: f64, x_max: f64, lambda: f64) -> f64 {
    let x0 = -lambda;
    let t = (depth - x0) / (x_max - x0);
    let n = n_max * t.powf((x_max - x0) / lambda) * ((x_max - depth) / lambda).exp();
    n.max(1.0)
}

/// Seeded splitmix64 stream for reproducible noise.
struct Jitter(u64);

impl Jitter {
    /// Multiplicative factor in `[1 - amount, 1 + amount)`.
    fn next(&mut self, amount: f64) -> f64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        let unit = (z >> 11) as f64 / (1u64 << 53) as f64;
        1.0 + amount * (2.0 * unit - 1.0)
    }
}

/// One row of every quantity the simulation can record.
struct Sample {
    particles: f64,
    nuclei: f64,
    pions: f64,
    electrons: f64,
    photons: f64,
    muons: f64,
    neutrinos: f64,
    remaining_energy: f64,
    ionization: f64,
}

impl Sample {
    fn at(depth: f64, noise: &mut Jitter) -> Self {
        let mut j = |v: f64| (v * noise.next(0.03)).max(1.0);

        let nuclei = j(gaisser_hillas(depth, 2e2, 150.0, 60.0));
        let pions = j(gaisser_hillas(depth, 3e3, 300.0, 70.0));
        let electrons = j(gaisser_hillas(depth, 6e5, 550.0, 70.0));
        let photons = j(gaisser_hillas(depth, 4e6, 530.0, 70.0));
        let muons = j(gaisser_hillas(depth, 3e4, 700.0, 300.0));
        let neutrinos = j(gaisser_hillas(depth, 5e4, 750.0, 300.0));

        let remaining_energy = PRIMARY_ENERGY * (-depth / 250.0).exp() + 1e9;
        let ionization = j(PRIMARY_ENERGY / 250.0 * (-depth / 250.0).exp() * 1e-2 + 1e9);

        Sample {
            particles: nuclei + pions + electrons + photons + muons + neutrinos,
            nuclei,
            pions,
            electrons,
            photons,
            muons,
            neutrinos,
            remaining_energy,
            ionization,
        }
    }

    /// Fields in the column order of `layout`.
    fn fields(&self, depth: f64, layout: Layout) -> Vec<f64> {
        layout
            .column_names()
            .iter()
            .map(|&name| match name {
                "depth" => depth,
                "particles" => self.particles,
                "nuclei" => self.nuclei,
                "pions" => self.pions,
                "electrons" => self.electrons,
                "photons" => self.photons,
                "muons" => self.muons,
                "neutrinos" => self.neutrinos,
                "remainin_energy" | "energy" => self.remaining_energy,
                "ionization" => self.ionization,
                _ => 0.0,
            })
            .collect()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut noise = Jitter(42);

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut out = BufWriter::new(file);

    for i in 0..args.rows {
        let depth = i as f64 * args.step;
        let fields: Vec<String> = Sample::at(depth, &mut noise)
            .fields(depth, args.layout)
            .iter()
            .map(|v| v.to_string())
            .collect();
        writeln!(out, "{}", fields.join("\t"))?;
    }
    out.flush()?;

    println!(
        "Wrote {} rows in the {} layout to {}",
        args.rows,
        args.layout,
        args.output.display()
    );
    Ok(())
}
