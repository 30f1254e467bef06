// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Carousel configuration.

use crate::CarouselError;

/// Default parallax tempo, in the same units as the item width.
pub const DEFAULT_TEMPO: f64 = 200.0;

/// Construction-time settings shared by every carousel layer.
///
/// - `item_width` is the page width along the scroll axis.
/// - `tempo` controls parallax strength; the displacement ratio is
///   `tempo / item_width`. Layers without parallax ignore it.
/// - `pool_limit` caps how many detached instances are kept for reuse.
///   `None` (the default) keeps every instance ever created.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CarouselConfig {
    /// Width of one page.
    pub item_width: f64,
    /// Parallax strength.
    pub tempo: f64,
    /// Maximum number of pooled instances, if any.
    pub pool_limit: Option<usize>,
}

impl CarouselConfig {
    /// Creates a config with the given item width and default tempo.
    #[must_use]
    pub const fn new(item_width: f64) -> Self {
        Self {
            item_width,
            tempo: DEFAULT_TEMPO,
            pool_limit: None,
        }
    }

    /// Sets the parallax tempo.
    #[must_use]
    pub const fn with_tempo(mut self, tempo: f64) -> Self {
        self.tempo = tempo;
        self
    }

    /// Sets the pool limit.
    #[must_use]
    pub const fn with_pool_limit(mut self, limit: Option<usize>) -> Self {
        self.pool_limit = limit;
        self
    }

    /// Checks that the item width is positive and the tempo is finite.
    pub fn validate(&self) -> Result<(), CarouselError> {
        validate_item_width(self.item_width)?;
        validate_tempo(self.tempo)
    }
}

pub(crate) fn validate_item_width(width: f64) -> Result<(), CarouselError> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(CarouselError::InvalidItemWidth(width))
    }
}

pub(crate) fn validate_tempo(tempo: f64) -> Result<(), CarouselError> {
    if tempo.is_finite() {
        Ok(())
    } else {
        Err(CarouselError::InvalidTempo(tempo))
    }
}

#[cfg(test)]
mod tests {
    use super::{CarouselConfig, DEFAULT_TEMPO};
    use crate::CarouselError;

    #[test]
    fn builder_defaults_and_overrides() {
        let config = CarouselConfig::new(320.0);
        assert_eq!(config.tempo, DEFAULT_TEMPO);
        assert_eq!(config.pool_limit, None);

        let config = config.with_tempo(50.0).with_pool_limit(Some(4));
        assert_eq!(config.tempo, 50.0);
        assert_eq!(config.pool_limit, Some(4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_width_and_tempo() {
        assert_eq!(
            CarouselConfig::new(0.0).validate(),
            Err(CarouselError::InvalidItemWidth(0.0))
        );
        assert_eq!(
            CarouselConfig::new(-5.0).validate(),
            Err(CarouselError::InvalidItemWidth(-5.0))
        );
        assert!(matches!(
            CarouselConfig::new(f64::NAN).validate(),
            Err(CarouselError::InvalidItemWidth(_))
        ));
        assert_eq!(
            CarouselConfig::new(10.0)
                .with_tempo(f64::INFINITY)
                .validate(),
            Err(CarouselError::InvalidTempo(f64::INFINITY))
        );
        // Negative tempo is allowed: it reverses the parallax direction.
        assert!(CarouselConfig::new(10.0).with_tempo(-20.0).validate().is_ok());
    }
}
