//! Error-prone read sampling from a circular reference.
//!
//! Reads come from two passes. The tiling pass starts windows at
//! `0, stride, 2 * stride, ...` (mod the reference length) so that every base is
//! covered; the random pass tops the set up with windows at uniform offsets.
//! Each read carries exactly one substitution.

use log::{debug, info, trace, warn};
use rand::Rng;

use crate::error::{Error, Result};
use crate::seq::{Reference, DEFAULT_ALPHABET};

pub const READ_LENGTH: usize = 100;
pub const NUM_READS: usize = 1618;
pub const TILING_STRIDE: usize = 137;
pub const TILING_READS: usize = 1000;

#[derive(Clone, Debug)]
pub struct Params {
    pub read_length: usize,
    /// Total reads, tiling reads included
    pub num_reads: usize,
    pub tiling_stride: usize,
    /// Upper bound on reads from the tiling pass
    pub tiling_reads: usize,
    /// Replacement symbols; needs two distinct symbols at least
    pub alphabet: Vec<u8>,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            read_length: READ_LENGTH,
            num_reads: NUM_READS,
            tiling_stride: TILING_STRIDE,
            tiling_reads: TILING_READS,
            alphabet: DEFAULT_ALPHABET.to_vec(),
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<()> {
        if self.read_length == 0 {
            return Err(Error::InvalidParameter("read length must be positive"));
        }
        if self.tiling_stride == 0 {
            return Err(Error::InvalidParameter("tiling stride must be positive"));
        }
        let first = self.alphabet.first().ok_or(Error::DegenerateAlphabet)?;
        if self.alphabet.iter().all(|b| b == first) {
            return Err(Error::DegenerateAlphabet);
        }
        Ok(())
    }

    /// Reads produced by the tiling pass.
    pub fn tiling_count(&self) -> usize {
        self.tiling_reads.min(self.num_reads)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Tiling,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Substitution {
    /// Offset inside the read
    pub position: usize,
    pub original: u8,
    pub replacement: u8,
}

#[derive(Clone, Debug)]
pub struct SimulatedRead {
    pub bases: Vec<u8>,
    /// Window start in the reference, always below its length
    pub start: usize,
    pub phase: Phase,
    pub substitution: Substitution,
}

impl AsRef<[u8]> for SimulatedRead {
    fn as_ref(&self) -> &[u8] {
        &self.bases
    }
}

/// Copies `window` and replaces one uniformly chosen base with a different
/// symbol drawn from `alphabet`.
///
/// Replacement symbols are drawn until one differs from the original, so
/// `alphabet` must hold two distinct symbols or this never returns.
pub fn mutate<R: Rng + ?Sized>(rng: &mut R, window: &[u8], alphabet: &[u8]) -> (Vec<u8>, Substitution) {
    let position = rng.gen_range(0..window.len());
    let original = window[position];

    let mut replacement = original;
    while replacement == original {
        replacement = alphabet[rng.gen_range(0..alphabet.len())];
    }

    let mut bases = window.to_vec();
    bases[position] = replacement;
    (bases, Substitution { position, original, replacement })
}

/// Start offsets of the tiling pass: `0, stride, 2 * stride, ...` modulo `length`.
pub fn tiling_offsets(length: usize, stride: usize) -> impl Iterator<Item = usize> {
    let step = stride % length;
    std::iter::successors(Some(0), move |&i| Some((i + step) % length))
}

fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    reference: &Reference,
    params: &Params,
    start: usize,
    phase: Phase,
) -> Result<SimulatedRead> {
    let window = reference.window(start, params.read_length)?;
    let (bases, substitution) = mutate(rng, window, &params.alphabet);
    trace!("{:?} read at {}: {:?}", phase, start, substitution);
    Ok(SimulatedRead { bases, start, phase, substitution })
}

/// Appends tiling reads until `reads` holds `params.tiling_count()` of them.
pub fn tiling_phase<R: Rng + ?Sized>(
    rng: &mut R,
    reference: &Reference,
    params: &Params,
    reads: &mut Vec<SimulatedRead>,
) -> Result<()> {
    let remaining = params.tiling_count().saturating_sub(reads.len());
    for start in tiling_offsets(reference.len(), params.tiling_stride).take(remaining) {
        reads.push(sample(rng, reference, params, start, Phase::Tiling)?);
    }
    Ok(())
}

/// Appends reads at uniform random offsets until `reads` holds `params.num_reads`.
pub fn random_phase<R: Rng + ?Sized>(
    rng: &mut R,
    reference: &Reference,
    params: &Params,
    reads: &mut Vec<SimulatedRead>,
) -> Result<()> {
    while reads.len() < params.num_reads {
        let start = rng.gen_range(0..reference.len());
        reads.push(sample(rng, reference, params, start, Phase::Random)?);
    }
    Ok(())
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Generates `params.num_reads` reads, tiling reads first.
pub fn simulate<R: Rng + ?Sized>(rng: &mut R, reference: &Reference, params: &Params) -> Result<Vec<SimulatedRead>> {
    params.validate()?;
    if params.read_length > reference.len() {
        return Err(Error::ReadTooLong {
            read_length: params.read_length,
            reference_length: reference.len(),
        });
    }

    let divisor = gcd(params.tiling_stride, reference.len());
    if divisor > 1 {
        warn!(
            "Tiling stride {} shares factor {} with reference length {}; only {} distinct tiling offsets",
            params.tiling_stride,
            divisor,
            reference.len(),
            reference.len() / divisor
        );
    }

    let mut reads = Vec::with_capacity(params.num_reads);

    tiling_phase(rng, reference, params, &mut reads)?;
    info!("Tiling phase: {} reads (stride {})", reads.len(), params.tiling_stride);

    let tiled = reads.len();
    if tiled < params.num_reads {
        random_phase(rng, reference, params, &mut reads)?;
        info!("Random phase: {} reads", reads.len() - tiled);
    } else {
        debug!("Random phase skipped, target of {} reads reached", params.num_reads);
    }

    Ok(reads)
}

/// Per-base read depth over the circular reference.
#[derive(Clone, Debug)]
pub struct Coverage {
    depth: Vec<u32>,
}

impl Coverage {
    pub fn from_reads(reference_length: usize, reads: &[SimulatedRead]) -> Self {
        let mut depth = vec![0u32; reference_length];
        if reference_length > 0 {
            for read in reads {
                for k in 0..read.bases.len() {
                    depth[(read.start + k) % reference_length] += 1;
                }
            }
        }
        Coverage { depth }
    }

    pub fn depth(&self) -> &[u32] {
        &self.depth
    }

    pub fn min_depth(&self) -> u32 {
        self.depth.iter().copied().min().unwrap_or(0)
    }

    pub fn mean_depth(&self) -> f64 {
        if self.depth.is_empty() {
            return 0.0;
        }
        self.depth.iter().map(|&d| d as f64).sum::<f64>() / self.depth.len() as f64
    }

    /// Number of reference positions no read touches.
    pub fn uncovered(&self) -> usize {
        self.depth.iter().filter(|&&d| d == 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reference_of(length: usize) -> Reference {
        let mut rng = StdRng::seed_from_u64(length as u64);
        let genome = crate::seq::random_genome(&mut rng, length, DEFAULT_ALPHABET).unwrap();
        Reference::from_bytes(&genome).unwrap()
    }

    fn assert_single_substitution(reference: &Reference, read: &SimulatedRead, alphabet: &[u8]) {
        let window = reference.window(read.start, read.bases.len()).unwrap();
        let differences: Vec<usize> = (0..window.len()).filter(|&k| window[k] != read.bases[k]).collect();
        assert_eq!(differences, vec![read.substitution.position]);
        assert_eq!(window[read.substitution.position], read.substitution.original);
        assert_ne!(read.substitution.replacement, read.substitution.original);
        assert!(alphabet.contains(&read.substitution.replacement));
    }

    #[test]
    fn test_mutate_changes_exactly_one_base() {
        let mut rng = StdRng::seed_from_u64(1);
        let window = b"ACGTACGTACGTACGTACGT";
        for _ in 0..200 {
            let (bases, substitution) = mutate(&mut rng, window, DEFAULT_ALPHABET);
            assert_eq!(bases.len(), window.len());
            let differences = bases.iter().zip(window.iter()).filter(|(a, b)| a != b).count();
            assert_eq!(differences, 1);
            assert_eq!(bases[substitution.position], substitution.replacement);
            assert_eq!(window[substitution.position], substitution.original);
        }
    }

    #[test]
    fn test_mutate_with_two_symbols() {
        let mut rng = StdRng::seed_from_u64(2);
        let (bases, substitution) = mutate(&mut rng, b"AAAA", b"AT");
        assert_eq!(substitution.replacement, b'T');
        assert_eq!(bases.iter().filter(|&&b| b == b'T').count(), 1);
    }

    #[test]
    fn test_tiling_offsets() {
        let offsets: Vec<usize> = tiling_offsets(1000, 137).take(9).collect();
        assert_eq!(offsets, vec![0, 137, 274, 411, 548, 685, 822, 959, 96]);

        let offsets: Vec<usize> = tiling_offsets(10, 137).take(4).collect();
        assert_eq!(offsets, vec![0, 7, 4, 1]);
    }

    #[test]
    fn test_default_params() {
        let params = Params::default();
        assert_eq!(params.read_length, 100);
        assert_eq!(params.num_reads, 1618);
        assert_eq!(params.tiling_stride, 137);
        assert_eq!(params.tiling_reads, 1000);
        assert_eq!(params.alphabet, b"ACGT");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_validation() {
        let params = Params { alphabet: b"AAAA".to_vec(), ..Params::default() };
        assert!(matches!(params.validate(), Err(Error::DegenerateAlphabet)));
        let params = Params { alphabet: Vec::new(), ..Params::default() };
        assert!(matches!(params.validate(), Err(Error::DegenerateAlphabet)));
        let params = Params { read_length: 0, ..Params::default() };
        assert!(matches!(params.validate(), Err(Error::InvalidParameter(_))));
        let params = Params { tiling_stride: 0, ..Params::default() };
        assert!(matches!(params.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_simulate_default_counts() {
        let mut rng = StdRng::seed_from_u64(3);
        let reference = reference_of(5386);
        let params = Params::default();
        let reads = simulate(&mut rng, &reference, &params).unwrap();

        assert_eq!(reads.len(), 1618);
        assert!(reads[..1000].iter().all(|r| r.phase == Phase::Tiling));
        assert!(reads[1000..].iter().all(|r| r.phase == Phase::Random));

        let expected: Vec<usize> = tiling_offsets(5386, 137).take(1000).collect();
        let starts: Vec<usize> = reads[..1000].iter().map(|r| r.start).collect();
        assert_eq!(starts, expected);

        for read in &reads {
            assert_eq!(read.bases.len(), 100);
            assert!(read.start < reference.len());
            assert_single_substitution(&reference, read, &params.alphabet);
        }
    }

    #[test]
    fn test_simulate_fewer_reads_than_tiling() {
        let mut rng = StdRng::seed_from_u64(4);
        let reference = reference_of(2000);
        let params = Params { num_reads: 500, ..Params::default() };
        let reads = simulate(&mut rng, &reference, &params).unwrap();
        assert_eq!(reads.len(), 500);
        assert!(reads.iter().all(|r| r.phase == Phase::Tiling));
    }

    #[test]
    fn test_simulate_tiny_reference() {
        let mut rng = StdRng::seed_from_u64(5);
        let reference = Reference::from_bytes(b"ACGTACGTAC").unwrap();
        let params = Params { read_length: 4, num_reads: 30, tiling_reads: 20, ..Params::default() };
        let reads = simulate(&mut rng, &reference, &params).unwrap();

        assert_eq!(reads.len(), 30);
        assert_eq!(reads[0].start, 0);
        assert_eq!(reads[1].start, 7);
        for read in &reads {
            assert_eq!(read.bases.len(), 4);
            assert!(read.bases.iter().all(|b| b"ACGT".contains(b)));
            assert_single_substitution(&reference, read, &params.alphabet);
        }
    }

    #[test]
    fn test_simulate_read_length_equals_reference() {
        let mut rng = StdRng::seed_from_u64(6);
        let reference = reference_of(100);
        let params = Params { num_reads: 300, tiling_reads: 100, ..Params::default() };
        let reads = simulate(&mut rng, &reference, &params).unwrap();
        assert_eq!(reads.len(), 300);
        for read in &reads {
            assert_eq!(read.bases.len(), 100);
            assert_single_substitution(&reference, read, &params.alphabet);
        }
    }

    #[test]
    fn test_simulate_read_too_long() {
        let mut rng = StdRng::seed_from_u64(7);
        let reference = reference_of(99);
        let result = simulate(&mut rng, &reference, &Params::default());
        assert!(matches!(
            result,
            Err(Error::ReadTooLong { read_length: 100, reference_length: 99 })
        ));
    }

    #[test]
    fn test_tiling_covers_reference() {
        let mut rng = StdRng::seed_from_u64(8);
        let reference = reference_of(5386);
        let params = Params { num_reads: 1000, ..Params::default() };
        let reads = simulate(&mut rng, &reference, &params).unwrap();

        let coverage = Coverage::from_reads(reference.len(), &reads);
        assert_eq!(coverage.uncovered(), 0);
        assert!(coverage.min_depth() >= 1);
        let expected_mean = (1000 * 100) as f64 / 5386.0;
        assert!((coverage.mean_depth() - expected_mean).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_counts_wrapped_reads() {
        let read = SimulatedRead {
            bases: b"ACG".to_vec(),
            start: 4,
            phase: Phase::Random,
            substitution: Substitution { position: 0, original: b'T', replacement: b'A' },
        };
        let coverage = Coverage::from_reads(5, &[read]);
        assert_eq!(coverage.depth(), &[1, 1, 0, 0, 1]);
        assert_eq!(coverage.uncovered(), 2);
        assert_eq!(coverage.min_depth(), 0);
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(137, 5386), 1);
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(5, 0), 5);
    }
}
