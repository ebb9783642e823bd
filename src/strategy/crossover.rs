use crate::engine::Direction;
use crate::error::{Result, SimError};

//bars where the fast line crosses the slow line in the trade direction
//long: fast crosses above slow
//short: fast crosses below slow
pub fn crossover_indices(fast: &[f64], slow: &[f64], direction: Direction) -> Result<Vec<usize>> {
    if fast.len() != slow.len() {
        return Err(SimError::InvalidShape(format!(
            "fast line has {} values, slow line has {}",
            fast.len(),
            slow.len()
        )));
    }

    Ok((1..fast.len())
        .filter(|&i| {
            let (prev_fast, prev_slow) = (fast[i - 1], slow[i - 1]);
            let (fast_now, slow_now) = (fast[i], slow[i]);
            match direction {
                Direction::Long => prev_fast <= prev_slow && fast_now > slow_now,
                Direction::Short => prev_fast >= prev_slow && fast_now < slow_now,
            }
        })
        .collect())
}
