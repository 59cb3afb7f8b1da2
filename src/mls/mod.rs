//! Maximum-length sequence generation with a linear-feedback shift
//! register.
//!
//! A maximum-length sequence (MLS) is the full-period output of an LFSR
//! driven by a primitive binary polynomial of degree n: a pseudorandom
//! binary sequence of length 2^n - 1 that visits every non-zero register
//! state exactly once before repeating. The near-ideal circular
//! autocorrelation of the bipolar mapping (a single sharp peak at zero
//! lag over a flat floor) makes these sequences the standard excitation
//! signal for acoustic impulse-response and hearing measurements.
//!
//! The register here is run in the Galois configuration: the emitted bit
//! is the register's LSB, and the update is a right shift followed by an
//! XOR with the polynomial mask whenever that bit was set. This is
//! different from the left-shifting Fibonacci arrangement pictured in
//! most references, but produces the same sequence family and only costs
//! one XOR per bit.
//!
//! Tap positions come from the published table of primitive binary
//! polynomials in Stahnke, W. (1973), "Primitive binary polynomials,"
//! Mathematics of Computation, 27:977-980, with exponents decremented
//! onto zero-indexed register bits. One polynomial per order in [2, 32]
//! is carried; orders outside that interval are rejected up front.

pub mod mls_node;

use rand::distributions::Uniform;
use rand::{FromEntropy, Rng, StdRng};
use std::error;
use std::fmt;

/// Smallest supported shift-register order.
pub const MIN_ORDER: u32 = 2;
/// Largest supported shift-register order.
pub const MAX_ORDER: u32 = 32;

/// Errors surfaced when configuring a sequence generator.
#[derive(Clone, Debug, PartialEq)]
pub enum MlsError {
    /// The requested shift-register order is outside [2, 32].
    InvalidOrder(u32),
    /// An explicit starting register of zero was supplied. Zero is the
    /// absorbing state of the register and can never occur in a legal
    /// run, so it is rejected rather than passed through.
    ZeroRegister,
}

impl fmt::Display for MlsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MlsError::InvalidOrder(n) => write!(
                f,
                "MLS error: order must be an integer in the interval \
                 [{}, {}], got {}",
                MIN_ORDER, MAX_ORDER, n
            ),
            MlsError::ZeroRegister => write!(
                f,
                "MLS error: the shift register must start non-zero"
            ),
        }
    }
}

impl error::Error for MlsError {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}

// Tap positions of one primitive binary polynomial per order in [2, 32],
// decremented from the polynomial exponents to index zero-indexed
// register bits. Entry i holds order i + 2.
const TAPS: [&[u8]; 31] = [
    &[1, 0],
    &[2, 0],
    &[3, 0],
    &[4, 1],
    &[5, 0],
    &[6, 0],
    &[7, 5, 4, 0],
    &[8, 3],
    &[9, 2],
    &[10, 1],
    &[11, 6, 3, 2],
    &[12, 3, 2, 0],
    &[13, 11, 10, 0],
    &[14, 0],
    &[15, 4, 2, 1],
    &[16, 2],
    &[17, 2],
    &[18, 5, 4, 0],
    &[19, 2],
    &[20, 1],
    &[21, 0],
    &[22, 4],
    &[23, 3, 2, 0],
    &[24, 2],
    &[25, 7, 6, 0],
    &[26, 7, 6, 0],
    &[27, 2],
    &[28, 1],
    &[29, 15, 14, 0],
    &[30, 2],
    &[31, 27, 26, 0],
];

// The same polynomials packed as bitmasks: for order n, the mask is
// sum(2^i) over the tap positions of TAPS[n - 2]. Both encodings are
// kept and must agree bit for bit; the generator runs off the masks.
const BINTAPS: [u32; 31] = [
    3,
    5,
    9,
    18,
    33,
    65,
    177,
    264,
    516,
    1026,
    2124,
    4109,
    11265,
    16385,
    32790,
    65540,
    131076,
    262193,
    524292,
    1048578,
    2097153,
    4194320,
    8388621,
    16777220,
    33554625,
    67109057,
    134217732,
    268435458,
    536920065,
    1073741828,
    2348810241,
];

fn tap_mask(order: u32) -> Result<u32, MlsError> {
    if order < MIN_ORDER || order > MAX_ORDER {
        return Err(MlsError::InvalidOrder(order));
    }
    Ok(BINTAPS[(order - MIN_ORDER) as usize])
}

/// Output element mapping for a generated sequence.
///
/// `Raw` leaves the emitted bits as {0, 1}. `Bipolar` remaps them onto
/// {-1, +1}, the form whose circular autocorrelation has the flat
/// off-peak floor used in acoustic measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Raw,
    Bipolar,
}

impl Default for OutputMode {
    fn default() -> OutputMode {
        OutputMode::Raw
    }
}

/// Galois-configuration LFSR engine underlying sequence generation.
///
/// This is the raw bit-stream producer: one non-zero 32-bit register and
/// one polynomial mask, advanced one bit per `next_bit()` call. State is
/// fresh per construction and never persists across generator instances.
/// Callers that cannot afford to materialize a full 2^n - 1 element
/// sequence (n = 32 implies ~4.3e9 elements) should pull bits from this
/// engine directly instead of calling [`mls`].
///
/// # Examples
///
/// ```
/// use hearlab_rs::mls::MlsGen;
///
/// let mut gen = MlsGen::new(3, true).unwrap();
/// let bits: Vec<u8> = (0..7).map(|_| gen.next_bit()).collect();
/// assert_eq!(bits, vec![1, 1, 1, 0, 1, 0, 0]);
/// ```
#[derive(Debug)]
pub struct MlsGen {
    poly_mask: u32,
    register: u32,
    order: u32,
}

impl MlsGen {
    /// Creates a generator for the given shift-register order.
    ///
    /// With `seeded` set the register starts at the canonical value 1 and
    /// the bit stream is reproducible; otherwise it starts at a uniform
    /// random value in [1, 2^n - 1], which selects a random cyclic
    /// rotation of the same full-period sequence. The draw range excludes
    /// the absorbing all-zero state by construction.
    ///
    /// # Arguments
    ///
    /// * `order` - Shift-register order n, an integer in [2, 32].
    /// * `seeded` - true for the fixed starting register, false for a
    /// random starting phase.
    pub fn new(order: u32, seeded: bool) -> Result<MlsGen, MlsError> {
        let poly_mask = tap_mask(order)?;
        let register = if seeded {
            1
        } else {
            let max = ((1u64 << order) - 1) as u32;
            let mut rng = StdRng::from_entropy();
            rng.sample(Uniform::new_inclusive(1u32, max))
        };
        debug_assert_ne!(register, 0);
        Ok(MlsGen {
            poly_mask,
            register,
            order,
        })
    }

    /// Creates a generator starting from an explicit register value, for
    /// callers that need control over the sequence phase. Bits above the
    /// register width are ignored; a register that is zero within the low
    /// `order` bits is rejected.
    pub fn from_register(
        order: u32,
        register: u32,
    ) -> Result<MlsGen, MlsError> {
        let poly_mask = tap_mask(order)?;
        let register = register & ((1u64 << order) - 1) as u32;
        if register == 0 {
            return Err(MlsError::ZeroRegister);
        }
        Ok(MlsGen {
            poly_mask,
            register,
            order,
        })
    }

    /// Emits the next bit of the sequence and advances the register one
    /// Galois step: `r = (r >> 1) ^ (lsb ? mask : 0)`.
    pub fn next_bit(&mut self) -> u8 {
        let lsb = (self.register & 1) as u8;
        self.register >>= 1;
        if lsb == 1 {
            self.register ^= self.poly_mask;
        }
        lsb
    }

    /// The shift-register order n.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// The sequence period, 2^n - 1.
    pub fn period(&self) -> u64 {
        (1u64 << self.order) - 1
    }

    /// The current register contents. Non-zero at all times.
    pub fn register(&self) -> u32 {
        self.register
    }
}

/// Generates a maximum-length sequence of length 2^n - 1 as raw {0, 1}
/// elements.
///
/// With `seeded` set the call is deterministic: the register starts at 1
/// and two calls with the same order produce identical output. Unseeded
/// calls start the register at a uniform random non-zero value, yielding
/// a random cyclic rotation of the same sequence. All order validation
/// happens before any register state is touched; on error no partial
/// output is produced.
///
/// # Arguments
///
/// * `order` - Shift-register order n, an integer in [2, 32].
/// * `seeded` - true for a reproducible sequence, false for a random
/// starting phase.
///
/// # Examples
///
/// ```
/// use hearlab_rs::mls;
///
/// let seq = mls::mls(3, true).unwrap();
/// assert_eq!(seq, vec![1, 1, 1, 0, 1, 0, 0]);
/// ```
pub fn mls(order: u32, seeded: bool) -> Result<Vec<i32>, MlsError> {
    mls_with_mode(order, seeded, OutputMode::Raw)
}

/// Generates a maximum-length sequence with an explicit output mapping.
///
/// Behaves as [`mls`] but remaps the emitted bits per `mode`:
/// `OutputMode::Raw` keeps {0, 1}, `OutputMode::Bipolar` yields
/// {-1, +1}.
///
/// # Examples
///
/// ```
/// use hearlab_rs::mls::{self, OutputMode};
///
/// let seq = mls::mls_with_mode(3, true, OutputMode::Bipolar).unwrap();
/// assert_eq!(seq, vec![1, 1, 1, -1, 1, -1, -1]);
/// ```
pub fn mls_with_mode(
    order: u32,
    seeded: bool,
    mode: OutputMode,
) -> Result<Vec<i32>, MlsError> {
    let mut gen = MlsGen::new(order, seeded)?;
    let seqlen = gen.period() as usize;
    let mut seq = Vec::with_capacity(seqlen);
    for _ in 0..seqlen {
        let bit = gen.next_bit();
        seq.push(match mode {
            OutputMode::Raw => i32::from(bit),
            OutputMode::Bipolar => 2 * i32::from(bit) - 1,
        });
    }
    Ok(seq)
}

#[cfg(test)]
mod test {
    use crate::mls::*;
    use std::collections::HashMap;

    #[test]
    // Both tap encodings must agree bit for bit, and every polynomial
    // must carry its leading exponent n - 1.
    fn test_tap_tables_agree() {
        for (i, taps) in TAPS.iter().enumerate() {
            let order = i as u32 + MIN_ORDER;
            let mask: u32 = taps.iter().map(|&t| 1u32 << t).sum();
            assert_eq!(mask, BINTAPS[i], "mask mismatch at order {}", order);
            assert!(taps.contains(&((order - 1) as u8)));
            assert!(u64::from(mask) < (1u64 << order));
        }
        assert_eq!(TAPS.len(), 31);
        assert_eq!(BINTAPS.len(), 31);
    }

    #[test]
    // A seeded run must be bit-for-bit reproducible and exactly one
    // period long.
    fn test_seeded_determinism() {
        for order in MIN_ORDER..=12 {
            let first = mls(order, true).unwrap();
            let second = mls(order, true).unwrap();
            assert_eq!(first.len(), (1usize << order) - 1);
            assert_eq!(first, second);
        }
    }

    #[test]
    // Hand-traced degree-3 fixture: taps {2, 0}, register starting at 1,
    // LSB emitted before each right-shift/XOR step.
    fn test_order_three_fixture() {
        assert_eq!(mls(3, true).unwrap(), vec![1, 1, 1, 0, 1, 0, 0]);
        assert_eq!(mls(2, true).unwrap(), vec![1, 1, 0]);
    }

    #[test]
    // The register must cycle through every non-zero n-bit value exactly
    // once per period. Checked exhaustively for the small orders.
    fn test_state_uniqueness() {
        for order in 2..=5u32 {
            let mut gen = MlsGen::new(order, true).unwrap();
            let period = gen.period();
            let mut statemap: HashMap<u32, u8> = HashMap::new();
            for _ in 0..period {
                assert!(statemap.insert(gen.register(), 1).is_none());
                gen.next_bit();
            }
            assert_eq!(statemap.len() as u64, period);
            // One full period later the register is back at the seed.
            assert_eq!(gen.register(), 1);
        }
    }

    #[test]
    // A full period carries 2^(n-1) ones and 2^(n-1) - 1 zeros.
    fn test_balance() {
        for order in &[4u32, 7, 10] {
            let seq = mls(*order, true).unwrap();
            let ones = seq.iter().filter(|&&x| x == 1).count();
            assert_eq!(ones, 1usize << (order - 1));
            assert_eq!(seq.len() - ones, (1usize << (order - 1)) - 1);
        }
    }

    #[test]
    // Orders outside [2, 32] must fail fast with no partial output.
    fn test_invalid_orders() {
        for order in &[0u32, 1, 33, 64, 1000] {
            match mls(*order, true) {
                Err(MlsError::InvalidOrder(n)) => assert_eq!(n, *order),
                other => panic!("expected InvalidOrder, got {:?}", other),
            }
            assert!(MlsGen::new(*order, false).is_err());
        }
    }

    #[test]
    // Random-phase runs still produce a full period, never touch the
    // zero register, and emit the same bit multiset as the seeded run.
    fn test_random_phase() {
        let order = 7u32;
        let period = (1usize << order) - 1;
        for _ in 0..50 {
            let mut gen = MlsGen::new(order, false).unwrap();
            let mut ones = 0usize;
            for _ in 0..period {
                assert_ne!(gen.register(), 0);
                ones += usize::from(gen.next_bit());
            }
            assert_eq!(ones, 1usize << (order - 1));
        }
    }

    #[test]
    // Unseeded starts select a rotation of the seeded sequence, so a
    // doubled seeded period must contain any unseeded period as a
    // window.
    fn test_random_phase_is_rotation() {
        let order = 5u32;
        let seeded = mls(order, true).unwrap();
        let mut doubled = seeded.clone();
        doubled.extend_from_slice(&seeded);
        for _ in 0..10 {
            let rotated = mls(order, false).unwrap();
            assert!(doubled
                .windows(rotated.len())
                .any(|w| w == rotated.as_slice()));
        }
    }

    #[test]
    // The explicit-register path must reject the absorbing zero state
    // and registers wider than the order.
    fn test_explicit_register() {
        assert_eq!(
            MlsGen::from_register(5, 0).unwrap_err(),
            MlsError::ZeroRegister
        );
        // 32 is zero within the 5 low bits of the register.
        assert_eq!(
            MlsGen::from_register(5, 32).unwrap_err(),
            MlsError::ZeroRegister
        );
        let mut gen = MlsGen::from_register(3, 5).unwrap();
        // Starting mid-cycle still walks the full period back to itself.
        let period = gen.period();
        for _ in 0..period {
            gen.next_bit();
        }
        assert_eq!(gen.register(), 5);
    }

    #[test]
    // Bipolar mode is a pure remapping of the raw sequence.
    fn test_output_modes() {
        let raw = mls_with_mode(6, true, OutputMode::Raw).unwrap();
        let bipolar = mls_with_mode(6, true, OutputMode::Bipolar).unwrap();
        assert_eq!(raw.len(), bipolar.len());
        for (r, b) in raw.iter().zip(bipolar.iter()) {
            match *r {
                0 => assert_eq!(*b, -1),
                1 => assert_eq!(*b, 1),
                _ => panic!("raw element outside {{0, 1}}"),
            }
        }
        assert_eq!(OutputMode::default(), OutputMode::Raw);
    }
}
