//cumulative pnl after each outcome
pub fn equity_curve(outcomes: &[f64]) -> Vec<f64> {
    outcomes
        .iter()
        .scan(0.0, |equity, &outcome| {
            *equity += outcome;
            Some(*equity)
        })
        .collect()
}

//shortfall of each point below the running peak
//the peak starts at the flat level 0
pub fn drawdowns(values: &[f64]) -> Vec<f64> {
    let mut max_runup = 0.0_f64;
    values
        .iter()
        .map(|&value| {
            max_runup = max_runup.max(value);
            max_runup - value
        })
        .collect()
}

//largest peak-to-trough decline in an ordered series
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut max_runup = 0.0_f64;
    let mut max_dd = 0.0_f64;
    for &value in values {
        max_runup = max_runup.max(value);
        max_dd = max_dd.max(max_runup - value);
    }
    max_dd
}
