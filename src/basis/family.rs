//! Basis families, coefficient layouts and validated basis specifications.

use std::fmt;
use std::str::FromStr;

use crate::error::{InterpError, Result};
use crate::polynomial::{
    gk_hybrid_modes, hybrid_modes, max_order_modes, serendipity_modes, tensor_modes,
};

/// Number of basis functions per cell for Serendipity bases, nodal or modal.
///
/// Indexed by `[num_dims - 1][poly_order - 1]`.
const SERENDIPITY_NUM_NODES: [[usize; 4]; 6] = [
    [2, 3, 4, 5],
    [4, 8, 12, 17],
    [8, 20, 32, 50],
    [16, 48, 80, 136],
    [32, 112, 192, 352],
    [64, 256, 448, 880],
];

/// Number of basis functions per cell for maximal-order bases.
///
/// Indexed by `[num_dims - 1][poly_order - 1]`.
const MAX_ORDER_NUM_NODES: [[usize; 4]; 5] = [
    [2, 3, 4, 5],
    [3, 6, 10, 15],
    [4, 10, 20, 35],
    [5, 15, 35, 70],
    [6, 21, 56, 126],
];

/// How the coefficients of one cell are laid out on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoefficientLayout {
    /// Node-major interleave: coefficient `n` of equation `c` sits at
    /// `c + n * num_equations`.
    Nodal,
    /// Equation-major blocks: the coefficients of equation `c` occupy
    /// `c * num_nodes .. (c + 1) * num_nodes`.
    Modal,
}

/// Polynomial basis family used by a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasisFamily {
    /// Lagrange-type Serendipity basis; coefficients are nodal values.
    NodalSerendipity,
    /// Orthonormal Serendipity basis.
    ModalSerendipity,
    /// Orthonormal maximal-order (total degree) basis.
    ModalMaxOrder,
    /// Orthonormal tensor-product basis.
    TensorProduct,
    /// Phase-space hybrid basis: linear in the first `config_dims` axes,
    /// quadratic in one velocity direction at a time.
    Hybrid { config_dims: usize },
    /// Gyrokinetic hybrid basis: quadratic only in parallel velocity.
    GkHybrid { config_dims: usize },
}

impl BasisFamily {
    /// On-disk coefficient layout implied by this family.
    pub fn layout(&self) -> CoefficientLayout {
        match self {
            BasisFamily::NodalSerendipity => CoefficientLayout::Nodal,
            BasisFamily::ModalSerendipity
            | BasisFamily::ModalMaxOrder
            | BasisFamily::TensorProduct
            | BasisFamily::Hybrid { .. }
            | BasisFamily::GkHybrid { .. } => CoefficientLayout::Modal,
        }
    }

    /// Short command-line code of the family.
    pub fn code(&self) -> &'static str {
        match self {
            BasisFamily::NodalSerendipity => "ns",
            BasisFamily::ModalSerendipity => "ms",
            BasisFamily::ModalMaxOrder => "mo",
            BasisFamily::TensorProduct => "mt",
            BasisFamily::Hybrid { .. } => "hyb",
            BasisFamily::GkHybrid { .. } => "gkhyb",
        }
    }

    /// Whether `(num_dims, poly_order)` has a closed-form expansion.
    pub fn supports(&self, num_dims: usize, poly_order: usize) -> bool {
        match *self {
            BasisFamily::NodalSerendipity => match num_dims {
                1 | 2 => (1..=3).contains(&poly_order),
                3 => (1..=2).contains(&poly_order),
                4 | 5 => poly_order == 1,
                _ => false,
            },
            BasisFamily::ModalSerendipity => match num_dims {
                1..=5 => poly_order <= 4,
                6 => poly_order <= 2,
                _ => false,
            },
            BasisFamily::ModalMaxOrder => (1..=5).contains(&num_dims) && poly_order <= 4,
            BasisFamily::TensorProduct => match num_dims {
                1..=3 => poly_order <= 4,
                4 | 5 => poly_order <= 2,
                _ => false,
            },
            BasisFamily::Hybrid { config_dims } => {
                poly_order == 1
                    && (1..=3).contains(&config_dims)
                    && num_dims > config_dims
                    && num_dims - config_dims <= 3
            }
            BasisFamily::GkHybrid { config_dims } => {
                poly_order == 1
                    && (1..=3).contains(&config_dims)
                    && num_dims > config_dims
                    && num_dims - config_dims <= 2
            }
        }
    }
}

impl fmt::Display for BasisFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisFamily::NodalSerendipity => write!(f, "nodal Serendipity"),
            BasisFamily::ModalSerendipity => write!(f, "modal Serendipity"),
            BasisFamily::ModalMaxOrder => write!(f, "modal maximal-order"),
            BasisFamily::TensorProduct => write!(f, "tensor-product"),
            BasisFamily::Hybrid { config_dims } => write!(f, "hybrid ({}x)", config_dims),
            BasisFamily::GkHybrid { config_dims } => write!(f, "gk-hybrid ({}x)", config_dims),
        }
    }
}

impl FromStr for BasisFamily {
    type Err = InterpError;

    /// Parse a command-line code (`ns`, `ms`, `mo`, `mt`) or a metadata name
    /// (`serendipity`, `maximal-order`, `tensor`).
    ///
    /// Hybrid families need a configuration-space dimension and are built
    /// directly instead.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ns" | "nodal-serendipity" => Ok(BasisFamily::NodalSerendipity),
            "ms" | "serendipity" | "modal-serendipity" => Ok(BasisFamily::ModalSerendipity),
            "mo" | "maximal-order" | "max-order" => Ok(BasisFamily::ModalMaxOrder),
            "mt" | "tensor" | "tensor-product" => Ok(BasisFamily::TensorProduct),
            _ => Err(InterpError::UnknownBasisName(s.to_string())),
        }
    }
}

/// A validated `(num_dims, poly_order, family)` triple.
///
/// Construction fails with [`InterpError::UnsupportedBasis`] for combinations
/// without a closed-form expansion, so every `BasisSpec` in circulation can be
/// turned into an interpolation matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BasisSpec {
    num_dims: usize,
    poly_order: usize,
    family: BasisFamily,
}

impl BasisSpec {
    /// Validate and create a basis specification.
    pub fn new(num_dims: usize, poly_order: usize, family: BasisFamily) -> Result<Self> {
        if !family.supports(num_dims, poly_order) {
            return Err(InterpError::UnsupportedBasis {
                family,
                num_dims,
                poly_order,
            });
        }
        Ok(Self {
            num_dims,
            poly_order,
            family,
        })
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    #[inline]
    pub fn poly_order(&self) -> usize {
        self.poly_order
    }

    #[inline]
    pub fn family(&self) -> BasisFamily {
        self.family
    }

    #[inline]
    pub fn layout(&self) -> CoefficientLayout {
        self.family.layout()
    }

    /// Default number of fine samples per axis, `poly_order + 1`.
    #[inline]
    pub fn default_samples_per_axis(&self) -> usize {
        self.poly_order + 1
    }

    /// Number of basis functions (degrees of freedom) per cell per equation.
    pub fn num_nodes(&self) -> usize {
        let (d, p) = (self.num_dims, self.poly_order);
        if p == 0 {
            return 1;
        }
        match self.family {
            BasisFamily::NodalSerendipity | BasisFamily::ModalSerendipity => {
                SERENDIPITY_NUM_NODES[d - 1][p - 1]
            }
            BasisFamily::ModalMaxOrder => MAX_ORDER_NUM_NODES[d - 1][p - 1],
            BasisFamily::TensorProduct => (p + 1).pow(d as u32),
            BasisFamily::Hybrid { config_dims } => {
                let v = d - config_dims;
                (1 << config_dims) * ((1 << v) + v * (1 << (v - 1)))
            }
            BasisFamily::GkHybrid { .. } => 3 * (1 << (d - 1)),
        }
    }

    /// Exponent vectors spanning this basis's polynomial space, in canonical order.
    pub fn modes(&self) -> Vec<Vec<usize>> {
        let (d, p) = (self.num_dims, self.poly_order);
        match self.family {
            BasisFamily::NodalSerendipity | BasisFamily::ModalSerendipity => {
                serendipity_modes(d, p)
            }
            BasisFamily::ModalMaxOrder => max_order_modes(d, p),
            BasisFamily::TensorProduct => tensor_modes(d, p),
            BasisFamily::Hybrid { config_dims } => hybrid_modes(config_dims, d - config_dims),
            BasisFamily::GkHybrid { config_dims } => gk_hybrid_modes(config_dims, d - config_dims),
        }
    }
}

impl fmt::Display for BasisSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} p={} in {}D",
            self.family, self.poly_order, self.num_dims
        )
    }
}

/// Cross-check the node-count tables against the enumerated mode sets.
///
/// Returns the first supported spec whose table entry disagrees with the
/// number of modes in its polynomial space.
pub fn validate_node_tables() -> Result<()> {
    let families = [
        BasisFamily::NodalSerendipity,
        BasisFamily::ModalSerendipity,
        BasisFamily::ModalMaxOrder,
        BasisFamily::TensorProduct,
    ];
    for family in families {
        for num_dims in 1..=6 {
            for poly_order in 0..=4 {
                let Ok(spec) = BasisSpec::new(num_dims, poly_order, family) else {
                    continue;
                };
                let enumerated = spec.modes().len();
                if enumerated != spec.num_nodes() {
                    return Err(InterpError::shape_mismatch(
                        format!("{} basis functions for {}", spec.num_nodes(), spec),
                        format!("{} enumerated modes", enumerated),
                    ));
                }
            }
        }
    }
    Ok(())
}
