use clap::{Parser, Subcommand};
use foam_reader::{CentroidMode, Field, FieldOptions, FoamCase, MeshOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "foam-reader", about = "Read OpenFOAM meshes and fields")]
struct Cli {
    /// Log filter: error, warn, info, debug, trace
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print cell centres, or face centres of one patch
    Mesh {
        case: PathBuf,
        #[arg(short, long)]
        patch: Option<String>,
        /// Average the points of owned and neighbouring faces
        #[arg(long)]
        all_faces: bool,
        /// Structured extents, e.g. 10,10,1
        #[arg(long, value_delimiter = ',')]
        shape: Option<Vec<usize>>,
    },
    /// Print a field at one time directory
    Field {
        case: PathBuf,
        time: String,
        name: String,
        #[arg(short, long)]
        patch: Option<String>,
        #[arg(long, value_delimiter = ',')]
        shape: Option<Vec<usize>>,
    },
    /// Print the category of a field file
    Type {
        case: PathBuf,
        time: String,
        name: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    env_logger::Builder::new().parse_filters(&cli.log_level).init();

    match cli.command {
        Commands::Mesh { case, patch, all_faces, shape } => {
            let foam = FoamCase::new(&case)?;
            let options = MeshOptions {
                boundary: patch,
                shape,
                centroid_mode: if all_faces { CentroidMode::AllFaces } else { CentroidMode::OwnerFaces },
            };
            let centres = foam.read_mesh(&options)?;
            println!("Case: {}", case.display());
            println!("{}", "=".repeat(60));
            println!("  Centres: {}", centres.len());
            println!("  Shape:   {:?}", centres.x.shape());
            for (label, axis) in [("x", &centres.x), ("y", &centres.y), ("z", &centres.z)] {
                let min = axis.iter().copied().fold(f64::INFINITY, f64::min);
                let max = axis.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                println!("  {} range: [{}, {}]", label, min, max);
            }
            for diagnostic in &centres.diagnostics {
                println!("  Note: {}", diagnostic);
            }
        }

        Commands::Field { case, time, name, patch, shape } => {
            let foam = FoamCase::new(&case)?;
            let options = FieldOptions { boundary: patch, shape };
            let field = foam.read_field(&time, &name, &options)?;
            print_field(&name, &field);
        }

        Commands::Type { case, time, name } => {
            let foam = FoamCase::new(&case)?;
            println!("{}", foam.read_field_type(&time, &name)?);
        }
    }
    Ok(())
}

fn print_field(name: &str, field: &Field) {
    println!("Field: {}", name);
    println!("{}", "=".repeat(60));
    println!("  Category:   {}", field.category);
    println!("  Storage:    {:?}", field.storage);
    println!("  Elements:   {}", field.count);
    println!("  Shape:      {:?}", field.data.shape());
    if let Some(dimensions) = &field.dimensions {
        println!("  Dimensions: {:?}", dimensions.0);
    }

    let preview: Vec<f64> = field.to_flat().into_iter().take(field.category.components() * 5).collect();
    println!("  First values: {:?}", preview);
    for diagnostic in &field.diagnostics {
        println!("  Note: {}", diagnostic);
    }
}
