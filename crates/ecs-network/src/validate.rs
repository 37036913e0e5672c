//! Network validation logic.

use std::collections::HashSet;

use crate::error::{NetworkError, NetworkResult};
use crate::network::{Pipe, Tank};

/// Validate the network structure: references exist, names are unique,
/// parameters are physical.
pub(crate) fn validate_structure(tanks: &[Tank], pipes: &[Pipe]) -> NetworkResult<()> {
    let mut names = HashSet::new();

    for tank in tanks {
        if !names.insert(tank.name.as_str()) {
            return Err(NetworkError::DuplicateName {
                name: tank.name.clone(),
            });
        }
        if !(tank.volume_m3.is_finite() && tank.volume_m3 > 0.0) {
            return Err(NetworkError::NonPhysicalTank {
                tank: tank.id,
                what: "volume",
            });
        }
        if !(tank.temperature_k.is_finite() && tank.temperature_k > 0.0) {
            return Err(NetworkError::NonPhysicalTank {
                tank: tank.id,
                what: "temperature",
            });
        }
        if !tank.mass_kg.is_finite() {
            return Err(NetworkError::NonPhysicalTank {
                tank: tank.id,
                what: "pressure",
            });
        }
    }

    for pipe in pipes {
        if !names.insert(pipe.name.as_str()) {
            return Err(NetworkError::DuplicateName {
                name: pipe.name.clone(),
            });
        }
        for end in [pipe.from, pipe.to] {
            if end.slot() >= tanks.len() {
                return Err(NetworkError::InvalidTankRef {
                    pipe: pipe.id,
                    tank: end,
                });
            }
        }
        if pipe.from == pipe.to {
            return Err(NetworkError::SelfLoop { pipe: pipe.id });
        }
        if !(pipe.conductance.is_finite() && pipe.conductance >= 0.0) {
            return Err(NetworkError::NonPhysicalPipe {
                pipe: pipe.id,
                what: "conductance",
            });
        }
    }

    Ok(())
}
