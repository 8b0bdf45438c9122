use serde::{Deserialize, Serialize};

use super::model::FeatureTable;
use super::tolerance::{Tolerance, ToleranceWindow};

// ---------------------------------------------------------------------------
// Near-duplicate detection
// ---------------------------------------------------------------------------

/// How the tolerance box query is answered.
///
/// Both strategies return identical results; [`ProximityStrategy::Exhaustive`]
/// is the reference the sorted variant is tested against.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ProximityStrategy {
    /// Compare every feature with every other feature. O(n²).
    Exhaustive,
    /// Binary search on a mass-sorted index, then filter on retention time.
    #[default]
    SortedMz,
}

/// Count the features that have at least one *other* feature inside their
/// tolerance box.
///
/// A feature always matches itself, so it counts once its match set holds
/// two or more features; how many neighbours it has beyond that does not
/// matter.  The mass radius is recomputed from every query feature's own
/// mass, the retention-time radius is converted from seconds once.
///
/// This is the exhaustive O(n²) query.  For large tables use
/// [`count_with_strategy`] with [`ProximityStrategy::SortedMz`].
pub fn count_within_tolerance(table: &FeatureTable, mz_tol_ppm: f64, rt_tol_sec: f64) -> usize {
    count_with_strategy(
        table,
        &Tolerance::new(mz_tol_ppm, rt_tol_sec),
        ProximityStrategy::Exhaustive,
    )
}

pub fn count_with_strategy(
    table: &FeatureTable,
    tolerance: &Tolerance,
    strategy: ProximityStrategy,
) -> usize {
    neighbor_flags(table, tolerance, strategy)
        .into_iter()
        .filter(|&has_neighbor| has_neighbor)
        .count()
}

/// Per feature, in table order: does it have a near-duplicate?
pub fn neighbor_flags(
    table: &FeatureTable,
    tolerance: &Tolerance,
    strategy: ProximityStrategy,
) -> Vec<bool> {
    let window = tolerance.window();
    match strategy {
        ProximityStrategy::Exhaustive => exhaustive_flags(table, &window),
        ProximityStrategy::SortedMz => sorted_mz_flags(table, &window),
    }
}

fn exhaustive_flags(table: &FeatureTable, window: &ToleranceWindow) -> Vec<bool> {
    table
        .iter()
        .map(|center| {
            let bounds = window.bounds(center);
            let matches = table.iter().filter(|other| bounds.contains(other)).count();
            matches >= 2
        })
        .collect()
}

fn sorted_mz_flags(table: &FeatureTable, window: &ToleranceWindow) -> Vec<bool> {
    let features = table.features();

    let mut order: Vec<usize> = (0..features.len()).collect();
    order.sort_by(|&a, &b| features[a].mz.total_cmp(&features[b].mz));
    let sorted_mz: Vec<f64> = order.iter().map(|&i| features[i].mz).collect();

    features
        .iter()
        .map(|center| {
            let bounds = window.bounds(center);
            let start = sorted_mz.partition_point(|&mz| mz < bounds.mz_lo);

            // Only the mass slice can contain matches; stop as soon as a
            // second match (self included) turns up.
            let mut matches = 0;
            for &idx in &order[start..] {
                let other = &features[idx];
                if !bounds.contains_mz(other.mz) {
                    break;
                }
                if bounds.contains(other) {
                    matches += 1;
                    if matches >= 2 {
                        return true;
                    }
                }
            }
            false
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Feature;

    fn table(rows: &[(f64, f64)]) -> FeatureTable {
        rows.iter()
            .enumerate()
            .map(|(i, &(mz, rt))| Feature::new(i.to_string(), mz, rt))
            .collect()
    }

    fn both(t: &FeatureTable, mz_ppm: f64, rt_sec: f64) -> usize {
        let tol = Tolerance::new(mz_ppm, rt_sec);
        let exhaustive = count_with_strategy(t, &tol, ProximityStrategy::Exhaustive);
        let sorted = count_with_strategy(t, &tol, ProximityStrategy::SortedMz);
        assert_eq!(exhaustive, sorted, "strategies disagree");
        exhaustive
    }

    #[test]
    fn close_pair_counts_both_features() {
        let t = table(&[(100.0, 5.0), (100.001, 5.0)]);
        assert_eq!(count_within_tolerance(&t, 20.0, 20.0), 2);
        assert_eq!(both(&t, 20.0, 20.0), 2);
    }

    #[test]
    fn narrow_mass_tolerance_separates_pair() {
        let t = table(&[(100.0, 5.0), (100.001, 5.0)]);
        assert_eq!(count_within_tolerance(&t, 5.0, 20.0), 0);
        assert_eq!(both(&t, 5.0, 20.0), 0);
    }

    #[test]
    fn empty_and_single_feature_tables_count_zero() {
        assert_eq!(both(&FeatureTable::default(), 20.0, 20.0), 0);
        assert_eq!(both(&table(&[(250.0, 3.0)]), 1e6, 1e6), 0);
    }

    #[test]
    fn retention_time_boundary_is_inclusive() {
        // 30 s is exactly 0.5 min
        let t = table(&[(300.0, 5.0), (300.0, 5.5)]);
        assert_eq!(both(&t, 0.0, 30.0), 2);
        assert_eq!(both(&t, 0.0, 29.0), 0);
    }

    #[test]
    fn identical_features_match_each_other() {
        let t: FeatureTable = vec![
            Feature::new("dup", 400.0, 2.0),
            Feature::new("dup", 400.0, 2.0),
            Feature::new("far", 900.0, 9.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(both(&t, 0.0, 0.0), 2);
    }

    #[test]
    fn each_feature_contributes_at_most_once() {
        let t = table(&[(200.0, 1.0), (200.0, 1.0), (200.0, 1.0), (200.0, 1.0)]);
        assert_eq!(both(&t, 1.0, 1.0), 4);
    }

    #[test]
    fn mass_radius_follows_the_query_feature() {
        // 10 ppm of 1000.0 is 0.01, of 1000.009 slightly more: both see each
        // other, but a 50 ppm neighbour at low mass is out of reach.
        let t = table(&[(1000.0, 1.0), (1000.009, 1.0), (100.0, 1.0), (100.004, 1.0)]);
        let flags = neighbor_flags(&t, &Tolerance::new(10.0, 0.0), ProximityStrategy::SortedMz);
        assert_eq!(flags, vec![true, true, false, false]);
    }

    #[test]
    fn far_apart_features_count_zero() {
        let rows: Vec<(f64, f64)> = (0..50).map(|i| (100.0 + i as f64, i as f64)).collect();
        assert_eq!(both(&table(&rows), 20.0, 20.0), 0);
    }

    #[test]
    fn flags_follow_table_order() {
        let t = table(&[(500.0, 1.0), (100.0, 5.0), (100.0005, 5.05)]);
        let flags = neighbor_flags(&t, &Tolerance::new(20.0, 10.0), ProximityStrategy::SortedMz);
        assert_eq!(flags, vec![false, true, true]);
    }
}
