//! Ratio-space to device-space coordinate mapping.
//!
//! A [`RatioMapper`] projects a normalized [0, 1] ratio coordinate into one
//! surface's device pixels, honoring centered-origin surfaces. A
//! [`ContainerMapper`] composes two of them with a bounding box to express a
//! surface-local point in the space of the container it is displayed within,
//! after the surface has been scaled and centered onto it.

use glam::DVec2;

/// Linearly maps `value` from the range `[in_min, in_max]` to
/// `[out_min, out_max]`.
///
/// No clamping is performed; values outside the input range extrapolate.
/// A zero-width input range produces a non-finite result, which callers own.
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// Projects normalized [0, 1] ratio coordinates into one surface's device
/// pixels.
///
/// Standard-origin surfaces span `[0, w] x [0, h]`; centered-origin surfaces
/// span `[-w/2, w/2] x [-h/2, h/2]`. Pure function of its three fields.
/// Inputs are never clamped: callers may pass ratios outside [0, 1] to
/// address off-surface space intentionally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioMapper {
    width: f64,
    height: f64,
    centered_origin: bool,
}

impl RatioMapper {
    pub fn new(width: f64, height: f64, centered_origin: bool) -> Self {
        Self {
            width,
            height,
            centered_origin,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn centered_origin(&self) -> bool {
        self.centered_origin
    }

    pub fn min_x(&self) -> f64 {
        if self.centered_origin {
            -self.width / 2.0
        } else {
            0.0
        }
    }

    pub fn max_x(&self) -> f64 {
        if self.centered_origin {
            self.width / 2.0
        } else {
            self.width
        }
    }

    pub fn min_y(&self) -> f64 {
        if self.centered_origin {
            -self.height / 2.0
        } else {
            0.0
        }
    }

    pub fn max_y(&self) -> f64 {
        if self.centered_origin {
            self.height / 2.0
        } else {
            self.height
        }
    }

    /// Device x for a ratio in [0, 1] (unclamped).
    pub fn x_for_ratio(&self, ratio: f64) -> f64 {
        map_range(ratio, 0.0, 1.0, self.min_x(), self.max_x())
    }

    /// Device y for a ratio in [0, 1] (unclamped).
    pub fn y_for_ratio(&self, ratio: f64) -> f64 {
        map_range(ratio, 0.0, 1.0, self.min_y(), self.max_y())
    }

    /// Ratio for a device x; inverse of [`Self::x_for_ratio`].
    pub fn ratio_for_x(&self, x: f64) -> f64 {
        map_range(x, self.min_x(), self.max_x(), 0.0, 1.0)
    }

    /// Ratio for a device y; inverse of [`Self::y_for_ratio`].
    pub fn ratio_for_y(&self, y: f64) -> f64 {
        map_range(y, self.min_y(), self.max_y(), 0.0, 1.0)
    }

    /// Device point for a ratio point.
    pub fn point_for_ratio(&self, ratio: DVec2) -> DVec2 {
        DVec2::new(self.x_for_ratio(ratio.x), self.y_for_ratio(ratio.y))
    }

    /// Ratio point for a device point.
    pub fn ratio_for_point(&self, point: DVec2) -> DVec2 {
        DVec2::new(self.ratio_for_x(point.x), self.ratio_for_y(point.y))
    }
}

/// Composes a surface mapper with the mapper of the container it is
/// displayed within.
///
/// The bounding box (`min_container_position`, `max_container_position`, in
/// the container's device space) is where the surface lands inside the
/// container after scaling and centering. Translation runs in two stages:
/// a surface-local coordinate becomes a surface ratio, the ratio re-projects
/// through the bounding box into container device space, and from there
/// optionally into the container's own ratio space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerMapper {
    surface: RatioMapper,
    container: RatioMapper,
    min_container_position: DVec2,
    max_container_position: DVec2,
}

impl ContainerMapper {
    pub fn new(
        surface: RatioMapper,
        container: RatioMapper,
        min_container_position: DVec2,
        max_container_position: DVec2,
    ) -> Self {
        Self {
            surface,
            container,
            min_container_position,
            max_container_position,
        }
    }

    pub fn surface(&self) -> &RatioMapper {
        &self.surface
    }

    pub fn container(&self) -> &RatioMapper {
        &self.container
    }

    pub fn min_container_position(&self) -> DVec2 {
        self.min_container_position
    }

    pub fn max_container_position(&self) -> DVec2 {
        self.max_container_position
    }

    /// Container device x for a surface ratio, projected through the
    /// bounding box.
    pub fn container_x_for_ratio(&self, ratio: f64) -> f64 {
        map_range(
            ratio,
            0.0,
            1.0,
            self.min_container_position.x,
            self.max_container_position.x,
        )
    }

    /// Container device y for a surface ratio, projected through the
    /// bounding box.
    pub fn container_y_for_ratio(&self, ratio: f64) -> f64 {
        map_range(
            ratio,
            0.0,
            1.0,
            self.min_container_position.y,
            self.max_container_position.y,
        )
    }

    /// Container device x for a surface-local device x.
    pub fn container_x(&self, surface_x: f64) -> f64 {
        self.container_x_for_ratio(self.surface.ratio_for_x(surface_x))
    }

    /// Container device y for a surface-local device y.
    pub fn container_y(&self, surface_y: f64) -> f64 {
        self.container_y_for_ratio(self.surface.ratio_for_y(surface_y))
    }

    /// Container ratio for a surface-local device x.
    pub fn container_ratio_x(&self, surface_x: f64) -> f64 {
        self.container.ratio_for_x(self.container_x(surface_x))
    }

    /// Container ratio for a surface-local device y.
    pub fn container_ratio_y(&self, surface_y: f64) -> f64 {
        self.container.ratio_for_y(self.container_y(surface_y))
    }

    /// Container device point for a surface ratio point.
    pub fn container_point_for_ratio(&self, ratio: DVec2) -> DVec2 {
        DVec2::new(
            self.container_x_for_ratio(ratio.x),
            self.container_y_for_ratio(ratio.y),
        )
    }

    /// Container device point for a surface-local device point.
    pub fn container_point(&self, surface_point: DVec2) -> DVec2 {
        DVec2::new(
            self.container_x(surface_point.x),
            self.container_y(surface_point.y),
        )
    }

    /// Container ratio point for a surface-local device point.
    pub fn container_ratio_point(&self, surface_point: DVec2) -> DVec2 {
        DVec2::new(
            self.container_ratio_x(surface_point.x),
            self.container_ratio_y(surface_point.y),
        )
    }
}
