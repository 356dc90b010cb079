use clap::{Parser, Subcommand};
use emblem_scan::detector::features::FeatureIdGen;
use emblem_scan::pipeline::{extract_features, segment};
use emblem_scan::tools::{
    dataset_iter, dataset_root_from_env, draw_detections, limit_from_env, load_bgr, mask_stats,
    save_image,
};
use emblem_scan::{Detection, Detector, DetectorConfig, PipelineTelemetry};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "emblemtool", version, about = "Two-lobed emblem detector")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run detection on a single image
    Detect {
        #[arg(long)]
        image: PathBuf,
        /// Write a copy of the image with detections outlined
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run detection over a dataset directory or an explicit list of files
    Batch {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        paths: Vec<PathBuf>,
    },
    /// Print colour mask statistics and lobe features for an image
    Inspect {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let detector = Detector::from_env();

    let ok = match cli.command {
        Command::Detect { image, output } => detect_cmd(&detector, &image, output.as_deref()),
        Command::Batch { root, limit, paths } => batch_cmd(&detector, root, limit, paths),
        Command::Inspect { image } => inspect_cmd(detector.config(), &image),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_detections(detections: &[Detection]) {
    for (i, d) in detections.iter().enumerate() {
        println!(
            "  Emblem {}: x={} y={} w={} h={} ring_compactness={:.3} white_fill={:.3}",
            i, d.rect.x, d.rect.y, d.rect.width, d.rect.height, d.ring_compactness, d.fill_ratio
        );
    }
}

fn detect_cmd(detector: &Detector, image: &Path, output: Option<&Path>) -> bool {
    let source = match load_bgr(image) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}", err);
            return false;
        }
    };

    let start = Instant::now();
    let (detections, telemetry) = match detector.detect_with_telemetry(&source) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Detection failed for {}: {}", image.display(), err);
            return false;
        }
    };
    let elapsed = start.elapsed();

    println!(
        "Image: {} ({}x{})",
        image.display(),
        source.width(),
        source.height()
    );
    println!(
        "Found {} emblems in {:.2} ms",
        detections.len(),
        elapsed.as_secs_f64() * 1000.0
    );
    print_detections(&detections);
    print_telemetry(&telemetry);

    if let Some(output) = output {
        let written = draw_detections(&source, &detections)
            .and_then(|annotated| save_image(output, &annotated));
        match written {
            Ok(()) => println!("Annotated image written to {}", output.display()),
            Err(err) => {
                eprintln!("{}", err);
                return false;
            }
        }
    }
    true
}

fn print_telemetry(t: &PipelineTelemetry) {
    println!(
        "  components={} quarter_like={} candidates={} pairs={} fill_ok={} ring_rejected={}",
        t.components, t.quarter_candidates, t.candidates, t.pairs, t.fill_accepted, t.ring_rejected
    );
}

fn batch_cmd(
    detector: &Detector,
    root: Option<PathBuf>,
    limit: Option<usize>,
    paths: Vec<PathBuf>,
) -> bool {
    let files: Vec<PathBuf> = if paths.is_empty() {
        let root = root.unwrap_or_else(dataset_root_from_env);
        dataset_iter(&root, limit.or_else(limit_from_env)).collect()
    } else {
        paths
    };

    if files.is_empty() {
        eprintln!("No images found");
        return false;
    }

    let start = Instant::now();
    let results: Vec<_> = files
        .par_iter()
        .map(|path| load_bgr(path).and_then(|image| detector.detect(&image)))
        .collect();
    let elapsed = start.elapsed();

    let mut failures = 0usize;
    let mut with_emblem = 0usize;
    for (path, result) in files.iter().zip(&results) {
        match result {
            Ok(detections) => {
                if !detections.is_empty() {
                    with_emblem += 1;
                }
                println!("{}: {} emblems", path.display(), detections.len());
                print_detections(detections);
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: {}", path.display(), err);
            }
        }
    }

    println!(
        "Processed {} images ({} with emblems, {} failed) in {:.2} s",
        files.len(),
        with_emblem,
        failures,
        elapsed.as_secs_f64()
    );
    failures < files.len()
}

fn inspect_cmd(config: &DetectorConfig, image: &Path) -> bool {
    let source = match load_bgr(image) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}", err);
            return false;
        }
    };
    println!(
        "Image: {} ({}x{})",
        image.display(),
        source.width(),
        source.height()
    );

    let masks = match segment(&source, config) {
        Ok(masks) => masks,
        Err(err) => {
            eprintln!("Segmentation failed: {}", err);
            return false;
        }
    };
    for (name, mask) in [
        ("blue", &masks.blue),
        ("white", &masks.white),
        ("black", &masks.black),
    ] {
        let stats = mask_stats(mask);
        println!(
            "{:>5} mask: {} / {} pixels ({:.2}%)",
            name,
            stats.foreground,
            stats.total,
            stats.ratio * 100.0
        );
    }

    let mut ids = FeatureIdGen::new();
    match extract_features(&masks.blue, config, &mut ids) {
        Ok(features) => {
            println!("{} lobe components", features.len());
            for f in &features {
                println!("  {}", f);
            }
            true
        }
        Err(err) => {
            eprintln!("Feature extraction failed: {}", err);
            false
        }
    }
}
