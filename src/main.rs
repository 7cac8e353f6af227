use std::path::PathBuf;

use readsim::logger;
use readsim::seq::{self, Reference};
use readsim::sim::{self, Coverage, Params};

use log::{error, info, warn};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "readsim", about = "Simulate error-prone sequencing reads from a circular reference")]
struct Opt {
    /// Increase log verbosity (-v debug, -vv trace)
    #[structopt(short, long, parse(from_occurrences), global = true)]
    verbose: u8,

    /// Only log errors
    #[structopt(short, long, global = true)]
    quiet: bool,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Sample reads with one substitution each
    Reads {
        /// Reference sequence file (plain text, one sequence)
        #[structopt(short, long, parse(from_os_str))]
        input: PathBuf,

        /// Output file, one read per line
        #[structopt(short, long, parse(from_os_str), default_value = "reads.txt")]
        output: PathBuf,

        /// Read length
        #[structopt(short = "l", long, default_value = "100")]
        read_length: usize,

        /// Total number of reads
        #[structopt(short, long, default_value = "1618")]
        num_reads: usize,

        /// Offset increment between tiling reads
        #[structopt(long, default_value = "137")]
        stride: usize,

        /// Reads taken at tiling offsets before switching to random ones
        #[structopt(long, default_value = "1000")]
        tiling: usize,

        #[structopt(long, default_value = "ACGT")]
        alphabet: String,

        /// Reject references containing symbols outside the alphabet
        #[structopt(long)]
        strict: bool,
    },
    /// Generate a uniform random reference sequence
    Genome {
        #[structopt(short, long, parse(from_os_str), default_value = "genome.txt")]
        output: PathBuf,

        /// Sequence length
        #[structopt(short, long, default_value = "5000")]
        length: usize,

        #[structopt(long, default_value = "ACGT")]
        alphabet: String,
    },
}

fn run(cmd: Command) -> readsim::Result<()> {
    let mut rng = rand::thread_rng();

    match cmd {
        Command::Reads { input, output, read_length, num_reads, stride, tiling, alphabet, strict } => {
            let params = Params {
                read_length,
                num_reads,
                tiling_stride: stride,
                tiling_reads: tiling,
                alphabet: alphabet.into_bytes(),
            };

            let reference = Reference::from_path(&input)?;
            info!("Loaded reference {} ({} bp)", input.display(), reference.len());
            if strict {
                reference.validate(&params.alphabet)?;
            }

            let reads = sim::simulate(&mut rng, &reference, &params)?;

            let coverage = Coverage::from_reads(reference.len(), &reads);
            info!("Coverage: mean {:.2}, min {}", coverage.mean_depth(), coverage.min_depth());
            if coverage.uncovered() > 0 {
                warn!("{} reference positions are not covered by any read", coverage.uncovered());
            }

            seq::write_reads(&output, &reads)?;
            info!("Wrote {} reads to {}", reads.len(), output.display());
        }
        Command::Genome { output, length, alphabet } => {
            let genome = seq::random_genome(&mut rng, length, alphabet.as_bytes())?;
            seq::write_genome(&output, &genome)?;
            info!("Wrote {} bp genome to {}", genome.len(), output.display());
        }
    }
    Ok(())
}

fn main() {
    let opt = Opt::from_args();
    if let Err(e) = logger::init_logger(logger::level_from_verbosity(opt.verbose, opt.quiet)) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(opt.cmd) {
        error!("{}", e);
        std::process::exit(1);
    }
}
