use num_traits::Float;

/// A point on the surface of a celestial body, given in degrees.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

/// A [`GeoPoint`] that can be constructed from its coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;

    /// Creates a point from longitude and latitude in degrees. This is the order GeoJSON uses.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }

    /// Creates a point from latitude and longitude in radians.
    fn latlon_rad(lat: N, lon: N) -> Self
    where
        N: Float,
    {
        Self::latlon(lat.to_degrees(), lon.to_degrees())
    }
}
