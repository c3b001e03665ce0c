use clap::{Args, Parser, Subcommand, ValueEnum};
use libcint::prelude::*;
use rstsr::prelude::*;
use rstsr_atom_integrals::prelude::*;
use rstsr_atom_integrals::util;

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct CliParser {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IntorKind {
    Ovlp,
    Kin,
    Nuc,
    Hcore,
    Eri,
}

impl IntorKind {
    fn rank(&self) -> usize {
        match self {
            IntorKind::Eri => 4,
            _ => 2,
        }
    }
}

#[derive(Args, Debug)]
struct BlockArgs {
    #[clap(short, long = "mol", help = "Path to the json file containing molecular data")]
    mol_file: String,

    #[clap(short, long, value_enum, help = "Integral to evaluate")]
    kind: IntorKind,

    #[clap(short, long, help = "Atom subset of one axis (`all` or comma-separated ids), given once per axis")]
    atoms: Vec<Atoms>,

    #[clap(short, long = "out", help = "Path of the npy file to write the block to")]
    out_file: Option<String>,
}

#[derive(Args, Debug)]
struct TransformArgs {
    #[clap(short, long = "input", help = "Path to the npy file of the tensor to transform")]
    input_file: String,

    #[clap(short, long = "psi", help = "Path to the npy file of the transformation matrix")]
    psi_file: String,

    #[clap(long, default_value = "all", help = "Axes to transform: `all`, `f2`, `l2` or comma-separated axes")]
    axes: TransformAxes,

    #[clap(long, default_value = "fast", help = "Transform mode: `fast` or `onecall`")]
    mode: TransformMode,

    #[clap(short, long = "out", help = "Path of the npy file to write the result to")]
    out_file: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[clap(name = "ranges", about = "Show shell ranges and basis functions of an atom subset")]
    Ranges {
        #[clap(short, long = "mol", help = "Path to the json file containing molecular data")]
        mol_file: String,

        #[clap(short, long, default_value = "all", help = "Atom subset (`all` or comma-separated ids)")]
        atoms: Atoms,
    },

    #[clap(name = "block", about = "Evaluate an atom-indexed integral block")]
    Block(BlockArgs),

    #[clap(name = "transform", about = "Transform a tensor along selected axes")]
    Transform(TransformArgs),
}

/// Evaluate one integral kind over per-axis atom subsets, `atoms` holding `kind.rank()` entries.
fn block_tensor(provider: &IntegralProvider, kind: IntorKind, atoms: &[Atoms]) -> std::result::Result<Tsr, AtomIntError> {
    let a = |n: usize| atoms[n].clone();
    match kind {
        IntorKind::Ovlp => provider.get_ovlp(a(0), a(1)),
        IntorKind::Kin => provider.get_kin(a(0), a(1)),
        IntorKind::Nuc => provider.get_ext_pot(a(0), a(1)),
        IntorKind::Hcore => provider.get_hcore(a(0), a(1)),
        IntorKind::Eri => provider.get_eri(a(0), a(1), a(2), a(3)),
    }
}

fn run_block(args: BlockArgs) -> std::result::Result<(), AtomIntError> {
    let time = std::time::Instant::now();
    let cint_data = CInt::from_json(&args.mol_file);
    let provider = IntegralProvider::new(&cint_data);

    let mut atoms = args.atoms;
    let rank = args.kind.rank();
    match atoms.len() {
        0 => atoms = vec![Atoms::All; rank],
        n if n != rank => {
            return Err(AtomIntError::InvalidAtoms(format!("{:?} needs {rank} atom subsets, got {n}", args.kind)));
        },
        _ => (),
    }
    log::info!("{:?} block of atoms {atoms:?}", args.kind);

    let tsr = block_tensor(&provider, args.kind, &atoms)?;
    println!("Block shape: {:?}", tsr.shape());
    println!("Block norm: {}", (&tsr * &tsr).sum().sqrt());

    if let Some(out_file) = args.out_file {
        util::tensor_to_npy(tsr.view(), &out_file)?;
        log::info!("block written to {out_file}");
    }
    println!("Elapsed time for {:?} block: {:.2?}", args.kind, time.elapsed());
    Ok(())
}

fn run_transform(args: TransformArgs) -> std::result::Result<(), AtomIntError> {
    let o = util::tensor_from_npy(&args.input_file)?;
    let psi = util::tensor_from_npy(&args.psi_file)?;
    log::info!("transform {:?} by {:?} along {:?} ({:?})", o.shape(), psi.shape(), args.axes, args.mode);
    let result = transform(o.view(), psi.view(), args.axes, args.mode)?;
    println!("Result shape: {:?}", result.shape());
    util::tensor_to_npy(result.view(), &args.out_file)
}

fn main() -> std::result::Result<(), AtomIntError> {
    pretty_env_logger::init();
    let args = CliParser::parse();

    match args.command {
        Command::Ranges { mol_file, atoms } => {
            let cint_data = CInt::from_json(&mol_file);
            let provider = IntegralProvider::new(&cint_data);
            println!("Shell ranges: {:?}", provider.shell_ranges(atoms.clone()));
            println!("Basis functions: {:?}", provider.get_atom_basis(atoms, Atoms::All));
            for atom in 0..IntegralEngine::natm(&cint_data) {
                println!("Atom {atom}: {} basis functions", provider.atomic_basis_size(atom));
            }
        },
        Command::Block(block_args) => run_block(block_args)?,
        Command::Transform(transform_args) => run_transform(transform_args)?,
    }
    Ok(())
}
