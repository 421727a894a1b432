//! `lamina` command line.
//!
//! ```text
//! lamina solve problem.json --vtk output.vtk --stiffness stiffness_matrix.txt
//! lamina areas problem.json 2 2 --stiffness stiffness_matrix.txt --vtk-dir areas
//! lamina grid 0 0 4 2 4 2 --vtk grid.vtk
//! ```

mod error;
mod problem;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use error::{CliError, Result};
use lamina_core::report::{
    write_displacement_table, write_labelled_stiffness_matrix, write_stiffness_matrix,
};
use lamina_core::{
    solve_areas, vtk, GaussPointMapping, Material, RegularGrid, SolverConfig, SolverKind,
    StructuralSolver,
};
use problem::Problem;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "lamina", version, about = "Single-element plane-stress solver")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a problem file and print nodal displacements.
    Solve {
        /// JSON problem description.
        problem: PathBuf,
        /// Write the solution as legacy VTK.
        #[arg(long)]
        vtk: Option<PathBuf>,
        /// Write the stiffness matrix as text.
        #[arg(long)]
        stiffness: Option<PathBuf>,
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Solve a problem, then solve each cell of an nx × ny split of its
    /// element with the coarse displacements prescribed at the cell corners.
    Areas {
        /// JSON problem description.
        problem: PathBuf,
        /// Cells along x.
        nx: usize,
        /// Cells along y.
        ny: usize,
        /// Write the coarse and every cell stiffness matrix as text.
        #[arg(long)]
        stiffness: Option<PathBuf>,
        /// Write every cell solution as legacy VTK into this directory.
        #[arg(long)]
        vtk_dir: Option<PathBuf>,
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Write a regular grid as legacy VTK.
    #[command(allow_negative_numbers = true)]
    Grid {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        nx: usize,
        ny: usize,
        #[arg(long)]
        vtk: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    Lu,
    Cholesky,
}

impl From<Backend> for SolverKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Lu => SolverKind::DenseLu,
            Backend::Cholesky => SolverKind::Cholesky,
        }
    }
}

/// Solver settings shared by `solve` and `areas`.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
struct SolveOptions {
    /// Linear system backend.
    #[arg(long, value_enum, default_value_t = Backend::Lu)]
    solver: Backend,
    /// Evaluate Gauss points in parallel.
    #[arg(long)]
    parallel: bool,
    /// Scale the Gauss points by the element half extents.
    #[arg(long)]
    scaled_gauss: bool,
    /// Move prescribed displacements to the right-hand side before elimination.
    #[arg(long)]
    lift_prescribed: bool,
}

impl SolveOptions {
    fn config(&self) -> SolverConfig {
        SolverConfig {
            backend: self.solver.into(),
            parallel_integration: self.parallel,
            gauss_mapping: if self.scaled_gauss {
                GaussPointMapping::Scaled
            } else {
                GaussPointMapping::Natural
            },
            lift_prescribed_values: self.lift_prescribed,
            ..SolverConfig::default()
        }
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn flush(mut writer: BufWriter<File>, path: &Path) -> Result<()> {
    writer.flush().map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a problem and run the three solve phases.
fn solve_problem(path: &Path, options: SolveOptions) -> Result<(StructuralSolver<f64>, Material<f64>)> {
    let problem = Problem::load(path)?;
    let material = problem.material()?;
    let element = problem.element()?;
    let mut solver = StructuralSolver::new(problem.nodes)?
        .with_config(options.config())
        .with_element(element);

    solver.compute_stiffness(&material)?;
    info!("stiffness matrix calculated");
    solver.compute_force_vector()?;
    info!("force vector calculated");
    solver.compute_displacement_vector()?;
    info!("displacement vector calculated");

    Ok((solver, material))
}

fn solve(
    path: &Path,
    vtk_path: Option<&Path>,
    stiffness_path: Option<&Path>,
    options: SolveOptions,
) -> Result<()> {
    let (solver, material) = solve_problem(path, options)?;

    if let Some(out) = stiffness_path {
        let mut writer = create(out)?;
        write_stiffness_matrix(&mut writer, solver.stiffness_matrix())?;
        flush(writer, out)?;
        info!(path = %out.display(), "stiffness matrix saved");
    }

    let stdout = std::io::stdout();
    let mut console = stdout.lock();
    write_displacement_table(&mut console, &solver)?;

    let stress = solver.stress(&material)?;
    let centroid = stress.centroid.stress.0;
    writeln!(
        console,
        "\ncentroid stress: sxx = {:.6}, syy = {:.6}, txy = {:.6}\nmax von Mises: {:.6}",
        centroid[0],
        centroid[1],
        centroid[2],
        stress.max_von_mises()
    )
    .map_err(lamina_core::Error::from)?;

    if let Some(out) = vtk_path {
        let mut writer = create(out)?;
        vtk::write_solution(&mut writer, &solver)?;
        flush(writer, out)?;
        info!(path = %out.display(), "VTK file written");
    }

    Ok(())
}

fn areas(
    path: &Path,
    nx: usize,
    ny: usize,
    stiffness_path: Option<&Path>,
    vtk_dir: Option<&Path>,
    options: SolveOptions,
) -> Result<()> {
    let (coarse, material) = solve_problem(path, options)?;
    let cells = solve_areas(&coarse, &material, nx, ny)?;
    info!(cells = cells.len(), "sub-areas solved");

    let stdout = std::io::stdout();
    let mut console = stdout.lock();
    writeln!(console, "coarse element:").map_err(lamina_core::Error::from)?;
    write_displacement_table(&mut console, &coarse)?;
    for cell in &cells {
        writeln!(console, "\narea ({}, {}):", cell.column, cell.row).map_err(lamina_core::Error::from)?;
        write_displacement_table(&mut console, &cell.solver)?;
    }

    if let Some(out) = stiffness_path {
        let mut writer = create(out)?;
        write_stiffness_matrix(&mut writer, coarse.stiffness_matrix())?;
        for cell in &cells {
            writeln!(writer).map_err(lamina_core::Error::from)?;
            let label = format!("Area ({}, {})", cell.column, cell.row);
            write_labelled_stiffness_matrix(&mut writer, &label, cell.solver.stiffness_matrix())?;
        }
        flush(writer, out)?;
        info!(path = %out.display(), "stiffness matrices saved");
    }

    if let Some(dir) = vtk_dir {
        std::fs::create_dir_all(dir).map_err(|source| CliError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        for cell in &cells {
            let out = dir.join(format!("area_{}_{}.vtk", cell.column, cell.row));
            let mut writer = create(&out)?;
            vtk::write_solution(&mut writer, &cell.solver)?;
            flush(writer, &out)?;
        }
        info!(path = %dir.display(), "sub-area VTK files written");
    }

    Ok(())
}

fn grid(x0: f64, y0: f64, x1: f64, y1: f64, nx: usize, ny: usize, out: &Path) -> Result<()> {
    let grid = RegularGrid::new(x0, y0, x1, y1, nx, ny)?;
    let mut writer = create(out)?;
    vtk::write_grid(&mut writer, &grid)?;
    flush(writer, out)?;
    info!(
        points = grid.n_points(),
        cells = grid.n_cells(),
        path = %out.display(),
        "grid written"
    );
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Solve {
            problem,
            vtk,
            stiffness,
            options,
        } => solve(&problem, vtk.as_deref(), stiffness.as_deref(), options),
        Command::Areas {
            problem,
            nx,
            ny,
            stiffness,
            vtk_dir,
            options,
        } => areas(&problem, nx, ny, stiffness.as_deref(), vtk_dir.as_deref(), options),
        Command::Grid {
            x0,
            y0,
            x1,
            y1,
            nx,
            ny,
            vtk,
        } => grid(x0, y0, x1, y1, nx, ny, &vtk),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
