#![deny(missing_docs)]
#![doc = "Configuration resolver and evaluation engines for tau identification scale factors, tau energy scales and electron fake energy scales."]

pub mod components;
pub mod fes;
pub mod naming;
pub mod options;
pub mod resolver;
pub mod sf;
pub mod tes;
pub mod variant;

pub use components::{Component, Source, Variation};
pub use fes::{Region, TauFes};
pub use naming::DmBucket;
pub use options::SfOptions;
pub use resolver::{
    resolve_fes, resolve_sf, resolve_tes, EsScheme, ExtraSystematic, FesPlan, Scheme, SfPlan,
    TesPlan,
};
pub use sf::TauIdSf;
pub use tes::{EsTables, TauEs};
pub use variant::CorrectionVariant;
