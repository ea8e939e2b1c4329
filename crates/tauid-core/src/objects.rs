//! Numeric objects handed out by a correction store.
//!
//! Three shapes exist: binned step functions, piecewise polynomial curves and
//! point sets with asymmetric errors. All of them are validated when they are
//! built or deserialised, so lookups never index out of range.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TauIdError};

fn shape_error(code: &str, message: impl Into<String>) -> TauIdError {
    TauIdError::Corrupt(ErrorInfo::new(code, message))
}

/// Content and symmetric error of one bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Central value.
    pub value: f64,
    /// Symmetric error.
    #[serde(default)]
    pub error: f64,
}

impl Bin {
    /// Creates a bin.
    pub const fn new(value: f64, error: f64) -> Self {
        Self { value, error }
    }
}

fn check_errors(bins: &[Bin]) -> Result<(), TauIdError> {
    match bins.iter().position(|bin| !(bin.error >= 0.0)) {
        Some(index) => Err(TauIdError::Corrupt(
            ErrorInfo::new("tauid.binned.errors", "bin errors must be non-negative numbers")
                .with_context("bin", index.to_string()),
        )),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BinnedRepr {
    edges: Vec<f64>,
    bins: Vec<Bin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    underflow: Option<Bin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overflow: Option<Bin>,
}

/// Step function over a one dimensional axis.
///
/// Bins follow the half-open convention `[lo, hi)`. Queries below the first
/// edge use the explicit underflow bin when the artifact stores one and the
/// first bin otherwise; queries at or above the last edge behave the same way
/// with the overflow bin and the last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BinnedRepr", into = "BinnedRepr")]
pub struct BinnedCorrection {
    edges: Vec<f64>,
    bins: Vec<Bin>,
    underflow: Option<Bin>,
    overflow: Option<Bin>,
}

impl BinnedCorrection {
    /// Builds a table from `n + 1` strictly increasing edges and `n` bins.
    pub fn new(edges: Vec<f64>, bins: Vec<Bin>) -> Result<Self, TauIdError> {
        if bins.is_empty() {
            return Err(shape_error("tauid.binned.empty", "binned correction has no bins"));
        }
        if edges.len() != bins.len() + 1 {
            return Err(shape_error(
                "tauid.binned.edges",
                format!(
                    "{} bins need {} edges, found {}",
                    bins.len(),
                    bins.len() + 1,
                    edges.len()
                ),
            ));
        }
        if edges.iter().any(|edge| !edge.is_finite())
            || edges.windows(2).any(|pair| pair[0] >= pair[1])
        {
            return Err(shape_error(
                "tauid.binned.edges",
                "bin edges must be finite and strictly increasing",
            ));
        }
        check_errors(&bins)?;
        Ok(Self {
            edges,
            bins,
            underflow: None,
            overflow: None,
        })
    }

    /// Builds a table of `n` equal-width bins over `[lo, hi)`.
    pub fn uniform(lo: f64, hi: f64, bins: Vec<Bin>) -> Result<Self, TauIdError> {
        let n = bins.len().max(1);
        let width = (hi - lo) / n as f64;
        let edges = (0..=n).map(|i| lo + width * i as f64).collect();
        Self::new(edges, bins)
    }

    /// Attaches an explicit underflow bin.
    pub fn with_underflow(mut self, bin: Bin) -> Self {
        self.underflow = Some(bin);
        self
    }

    /// Attaches an explicit overflow bin.
    pub fn with_overflow(mut self, bin: Bin) -> Self {
        self.overflow = Some(bin);
        self
    }

    /// Bin edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// In-range bins.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Returns the bin holding `x`.
    pub fn locate(&self, x: f64) -> &Bin {
        let n = self.bins.len();
        // NaN compares false everywhere and lands in the underflow branch.
        if !(x >= self.edges[0]) {
            return self.underflow.as_ref().unwrap_or(&self.bins[0]);
        }
        if x >= self.edges[n] {
            return self.overflow.as_ref().unwrap_or(&self.bins[n - 1]);
        }
        let k = self.edges.partition_point(|edge| *edge <= x);
        &self.bins[k - 1]
    }

    /// All stored bins including explicit flow bins.
    pub fn all_bins(&self) -> impl Iterator<Item = &Bin> {
        self.underflow
            .iter()
            .chain(self.bins.iter())
            .chain(self.overflow.iter())
    }
}

impl TryFrom<BinnedRepr> for BinnedCorrection {
    type Error = TauIdError;

    fn try_from(repr: BinnedRepr) -> Result<Self, Self::Error> {
        let mut table = BinnedCorrection::new(repr.edges, repr.bins)?;
        let flow: Vec<Bin> = repr.underflow.iter().chain(repr.overflow.iter()).copied().collect();
        check_errors(&flow)?;
        table.underflow = repr.underflow;
        table.overflow = repr.overflow;
        Ok(table)
    }
}

impl From<BinnedCorrection> for BinnedRepr {
    fn from(table: BinnedCorrection) -> Self {
        Self {
            edges: table.edges,
            bins: table.bins,
            underflow: table.underflow,
            overflow: table.overflow,
        }
    }
}

/// Polynomial piece of a [`Curve`], valid on `[lo, hi)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Inclusive lower bound.
    pub lo: f64,
    /// Exclusive upper bound.
    pub hi: f64,
    /// Polynomial coefficients, constant term first.
    pub coefficients: Vec<f64>,
}

impl Segment {
    /// A constant piece.
    pub fn constant(lo: f64, hi: f64, value: f64) -> Self {
        Self {
            lo,
            hi,
            coefficients: vec![value],
        }
    }

    /// A straight line `a + b x`.
    pub fn linear(lo: f64, hi: f64, a: f64, b: f64) -> Self {
        Self {
            lo,
            hi,
            coefficients: vec![a, b],
        }
    }

    fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, coefficient| acc * x + coefficient)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurveRepr {
    segments: Vec<Segment>,
}

/// Piecewise polynomial function of momentum.
///
/// Outside the covered range the first or last piece is extrapolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRepr", into = "CurveRepr")]
pub struct Curve {
    segments: Vec<Segment>,
}

impl Curve {
    /// Builds a curve from ordered, non-overlapping segments.
    pub fn new(segments: Vec<Segment>) -> Result<Self, TauIdError> {
        if segments.is_empty() {
            return Err(shape_error("tauid.curve.empty", "curve has no segments"));
        }
        for segment in &segments {
            if !(segment.lo < segment.hi) || segment.coefficients.is_empty() {
                return Err(shape_error(
                    "tauid.curve.segment",
                    format!("invalid segment [{}, {})", segment.lo, segment.hi),
                ));
            }
        }
        if segments.windows(2).any(|pair| pair[1].lo < pair[0].hi) {
            return Err(shape_error(
                "tauid.curve.order",
                "curve segments must be ordered and non-overlapping",
            ));
        }
        Ok(Self { segments })
    }

    /// A curve that is constant everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            segments: vec![Segment::constant(f64::NEG_INFINITY, f64::INFINITY, value)],
        }
    }

    /// Segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Evaluates the curve at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        let k = self
            .segments
            .partition_point(|segment| segment.hi <= x)
            .min(self.segments.len() - 1);
        self.segments[k].eval(x)
    }
}

impl TryFrom<CurveRepr> for Curve {
    type Error = TauIdError;

    fn try_from(repr: CurveRepr) -> Result<Self, Self::Error> {
        Curve::new(repr.segments)
    }
}

impl From<Curve> for CurveRepr {
    fn from(curve: Curve) -> Self {
        Self {
            segments: curve.segments,
        }
    }
}

/// One point of a [`GraphCorrection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    /// Abscissa (bin centre or category index).
    pub x: f64,
    /// Distance from `x` to the lower edge of the point's range.
    #[serde(default)]
    pub x_err_low: f64,
    /// Distance from `x` to the upper edge of the point's range.
    #[serde(default)]
    pub x_err_high: f64,
    /// Central value.
    pub y: f64,
    /// Downward error.
    #[serde(default)]
    pub y_err_low: f64,
    /// Upward error.
    #[serde(default)]
    pub y_err_high: f64,
    /// Optional category name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphPoint {
    /// A point with symmetric x range and asymmetric y errors.
    pub fn new(x: f64, x_err: f64, y: f64, y_err_low: f64, y_err_high: f64) -> Self {
        Self {
            x,
            x_err_low: x_err,
            x_err_high: x_err,
            y,
            y_err_low,
            y_err_high,
            label: None,
        }
    }

    /// Names the point.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Upper edge of the point's x range.
    pub fn x_high(&self) -> f64 {
        self.x + self.x_err_high
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphRepr {
    points: Vec<GraphPoint>,
}

/// Finite set of points, each with asymmetric errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRepr", into = "GraphRepr")]
pub struct GraphCorrection {
    points: Vec<GraphPoint>,
}

impl GraphCorrection {
    /// Builds a graph; points must be ordered by `x` with non-negative errors.
    pub fn new(points: Vec<GraphPoint>) -> Result<Self, TauIdError> {
        if points.is_empty() {
            return Err(shape_error("tauid.graph.empty", "graph has no points"));
        }
        let bad_error = points.iter().any(|point| {
            [point.x_err_low, point.x_err_high, point.y_err_low, point.y_err_high]
                .iter()
                .any(|err| !(*err >= 0.0))
        });
        if bad_error {
            return Err(shape_error(
                "tauid.graph.errors",
                "graph errors must be non-negative numbers",
            ));
        }
        if points.windows(2).any(|pair| pair[0].x >= pair[1].x) {
            return Err(shape_error(
                "tauid.graph.order",
                "graph points must be strictly ordered in x",
            ));
        }
        Ok(Self { points })
    }

    /// Points in order.
    pub fn points(&self) -> &[GraphPoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a validated graph.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the point whose x range holds `x`.
    ///
    /// A value in a gap between two ranges belongs to the higher point; values
    /// beyond either end belong to the first or last point.
    pub fn locate(&self, x: f64) -> usize {
        self.points
            .partition_point(|point| point.x_high() <= x)
            .min(self.points.len() - 1)
    }
}

impl TryFrom<GraphRepr> for GraphCorrection {
    type Error = TauIdError;

    fn try_from(repr: GraphRepr) -> Result<Self, Self::Error> {
        GraphCorrection::new(repr.points)
    }
}

impl From<GraphCorrection> for GraphRepr {
    fn from(graph: GraphCorrection) -> Self {
        Self {
            points: graph.points,
        }
    }
}

/// Any object a correction store can return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumericObject {
    /// Binned step function.
    Binned(BinnedCorrection),
    /// Piecewise fitted curve.
    Curve(Curve),
    /// Points with asymmetric errors.
    Graph(GraphCorrection),
}

impl NumericObject {
    /// Short name of the object's shape.
    pub fn kind(&self) -> &'static str {
        match self {
            NumericObject::Binned(_) => "binned",
            NumericObject::Curve(_) => "curve",
            NumericObject::Graph(_) => "graph",
        }
    }
}
