//! Geographic helpers: neighborhood resolution, adjacency, radius filtering.
//!
//! Distance math lives on [`Coordinate`] in `meubairro-core`; this module
//! owns the pieces that touch rows and the geocoding service.

mod geocoder;

pub use geocoder::Geocoder;

use meubairro_core::Coordinate;

/// Sentinel returned whenever a neighborhood cannot be resolved.
pub const UNKNOWN_NEIGHBORHOOD: &str = "Bairro desconhecido";

/// Something that may carry a coordinate.
pub trait Located {
    fn coordinate(&self) -> Option<Coordinate>;
}

/// Keep the items whose coordinate is within `radius_km` of `origin`.
///
/// Items without a coordinate are dropped. A radius of zero means "this
/// bairro only, do not expand" and is handled as a distinct branch by the
/// search-scope resolver; it never reaches this function.
#[must_use]
pub fn within_radius<T: Located>(origin: Coordinate, items: Vec<T>, radius_km: f64) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| {
            item.coordinate()
                .is_some_and(|c| origin.distance_km(&c) <= radius_km)
        })
        .collect()
}

/// Neighbors of the given bairro from the static adjacency table.
///
/// The table covers only the seeded bairros; any other name yields an
/// empty slice. The data is carried verbatim from the seed set and no
/// symmetry is assumed by callers.
#[must_use]
pub fn neighbors_of(bairro: &str) -> &'static [&'static str] {
    match bairro {
        "Linha Santa Cruz" => &["Universitário", "Esmeralda"],
        "Universitário" => &["Linha Santa Cruz", "Esmeralda"],
        "Esmeralda" => &["Linha Santa Cruz", "Universitário"],
        _ => &[],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Spot {
        name: &'static str,
        coord: Option<Coordinate>,
    }

    impl Located for Spot {
        fn coordinate(&self) -> Option<Coordinate> {
            self.coord
        }
    }

    #[test]
    fn test_neighbors_of_unknown_is_empty() {
        assert!(neighbors_of("UnknownPlace").is_empty());
        assert!(neighbors_of("").is_empty());
    }

    #[test]
    fn test_neighbors_of_listed_bairros() {
        assert_eq!(
            neighbors_of("Linha Santa Cruz"),
            &["Universitário", "Esmeralda"]
        );
        assert_eq!(
            neighbors_of("Esmeralda"),
            &["Linha Santa Cruz", "Universitário"]
        );
    }

    #[test]
    fn test_within_radius_keeps_close_drops_far_and_coordless() {
        let origin = Coordinate::new(-29.7156, -52.4297);
        let spots = vec![
            Spot {
                name: "perto",
                coord: Some(Coordinate::new(-29.7200, -52.4300)),
            },
            Spot {
                name: "longe",
                coord: Some(Coordinate::new(-23.5505, -46.6333)),
            },
            Spot {
                name: "sem coordenada",
                coord: None,
            },
        ];

        let kept = within_radius(origin, spots, 5.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.first().unwrap().name, "perto");
    }

    #[test]
    fn test_within_radius_boundary_is_inclusive() {
        let origin = Coordinate::new(0.0, 0.0);
        let point = Coordinate::new(0.0, 0.5);
        let exact = origin.distance_km(&point);

        let kept = within_radius(
            origin,
            vec![Spot {
                name: "na borda",
                coord: Some(point),
            }],
            exact,
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_within_radius_empty_input() {
        let origin = Coordinate::new(0.0, 0.0);
        let kept: Vec<Spot> = within_radius(origin, Vec::new(), 5.0);
        assert!(kept.is_empty());
    }
}
