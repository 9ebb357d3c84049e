// Export our modules for use in binaries and tests
pub mod bucket;
pub mod chart;
pub mod color;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod scale;
pub mod summary;
pub mod surface;
pub mod tooltip;

pub use bucket::{Bucket, ColorBucketer, HEAT_SCALE};
pub use chart::{ChartRenderer, HoverHandler, PointerEvent, RenderedChart};
pub use dataset::{Dataset, DatasetLoader, LoadError};
pub use domain::{DataPoint, Month};
pub use scale::{Layout, Scales};
pub use surface::{Element, Surface};
pub use tooltip::{TooltipController, TooltipState};
