use ems_core::{HospitalId, Location, Priority};
use ems_spatial::{SpatialResult, TravelQuery};

#[derive(Clone, Debug, PartialEq)]
pub struct Hospital {
    pub index:     HospitalId,
    pub location:  Location,
    pub num_calls: u32,
}

impl Hospital {
    pub fn new(index: HospitalId, location: Location) -> Self {
        Self { index, location, num_calls: 0 }
    }
}

/// Hospital with the shortest travel duration from `location`; ties go to
/// the lowest index.  `None` when `hospitals` is empty.
pub fn nearest_hospital<T: TravelQuery + ?Sized>(
    travel:    &T,
    hospitals: &[Hospital],
    location:  Location,
    priority:  Priority,
) -> SpatialResult<Option<HospitalId>> {
    let mut best: Option<(f64, HospitalId)> = None;
    for h in hospitals {
        let d = travel.travel_duration(location, h.location, priority)?;
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, h.index));
        }
    }
    Ok(best.map(|(_, id)| id))
}
