// ABOUTME: Plugin composition for view types
// ABOUTME: Defines the Plugin trait and the interpolation plugin that installs a fresh filter registry

use tracing::info;

use super::error::Result;
use super::view::ViewType;
use crate::interpolate::Interpolator;

/// Extension installed onto a view type through [`ViewType::use_plugin`].
pub trait Plugin {
    fn name(&self) -> &str;

    fn install(&self, view_type: &ViewType) -> Result<()>;
}

/// Installs template interpolation on a view type.
///
/// Each install builds a brand-new [`Interpolator`], so two view types never
/// share filters even when configured identically.
#[derive(Debug, Clone, Default)]
pub struct Interpolate {
    builtin_filters: bool,
}

impl Interpolate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload the built-in filters into each new registry
    pub fn with_builtin_filters() -> Self {
        Self {
            builtin_filters: true,
        }
    }
}

impl Plugin for Interpolate {
    fn name(&self) -> &str {
        "interpolate"
    }

    fn install(&self, view_type: &ViewType) -> Result<()> {
        let interpolator = if self.builtin_filters {
            Interpolator::with_builtin_filters()?
        } else {
            Interpolator::new()
        };

        info!(
            "Installing interpolation on view type '{}' ({} filter(s))",
            view_type.name(),
            interpolator.filter_names().len()
        );

        view_type.set_interpolator(interpolator);
        Ok(())
    }
}
