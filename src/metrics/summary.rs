use crate::metrics::drawdown::{equity_curve, max_drawdown};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary metrics for a batch of simulated trades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub num_requests: usize,
    pub num_trades: usize,
    pub num_winning_trades: usize,
    pub num_losing_trades: usize,
    pub net_pnl: f64,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub profit_factor: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

impl SummaryMetrics {
    //calculate summary metrics from per-request outcomes
    //a zero outcome counts as no trade
    pub fn from_outcomes(outcomes: &[f64]) -> Self {
        let trades: Vec<f64> = outcomes.iter().copied().filter(|&o| o != 0.0).collect();

        let winning_trades: Vec<f64> = trades.iter().copied().filter(|&o| o > 0.0).collect();
        let losing_trades: Vec<f64> = trades.iter().copied().filter(|&o| o < 0.0).collect();

        let num_winning = winning_trades.len();
        let num_losing = losing_trades.len();

        let win_rate = if trades.is_empty() {
            0.0
        } else {
            num_winning as f64 / trades.len() as f64
        };

        let avg_win = if num_winning > 0 {
            winning_trades.iter().sum::<f64>() / num_winning as f64
        } else {
            0.0
        };

        let avg_loss = if num_losing > 0 {
            losing_trades.iter().sum::<f64>() / num_losing as f64
        } else {
            0.0
        };

        let total_wins: f64 = winning_trades.iter().sum();
        let total_losses: f64 = losing_trades.iter().sum::<f64>().abs();

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let largest_win = winning_trades.iter().fold(0.0f64, |a, &b| a.max(b));
        let largest_loss = losing_trades.iter().fold(0.0f64, |a, &b| a.min(b));

        SummaryMetrics {
            num_requests: outcomes.len(),
            num_trades: trades.len(),
            num_winning_trades: num_winning,
            num_losing_trades: num_losing,
            net_pnl: outcomes.iter().sum(),
            win_rate,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
            profit_factor,
            max_drawdown: max_drawdown(&equity_curve(outcomes)),
            sharpe_ratio: calculate_sharpe_ratio(&trades),
        }
    }

    //builds the metrics table
    pub fn to_table(&self, title: &str) -> Table {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new(title)]));

        table.add_row(Row::new(vec![
            Cell::new("Entries Evaluated"),
            Cell::new(&format!("{}", self.num_requests)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Trades Taken"),
            Cell::new(&format!("{}", self.num_trades)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Net P&L (points)"),
            Cell::new(&format!("{:.2}", self.net_pnl)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Win Rate"),
            Cell::new(&format!("{:.2}%", self.win_rate * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Avg Win"),
            Cell::new(&format!("{:.2}", self.avg_win)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Avg Loss"),
            Cell::new(&format!("{:.2}", self.avg_loss)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Largest Win"),
            Cell::new(&format!("{:.2}", self.largest_win)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Largest Loss"),
            Cell::new(&format!("{:.2}", self.largest_loss)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Profit Factor"),
            Cell::new(&format!("{:.3}", self.profit_factor)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Max Drawdown (points)"),
            Cell::new(&format!("{:.2}", self.max_drawdown)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Sharpe (per trade)"),
            Cell::new(&format!("{:.3}", self.sharpe_ratio)),
        ]));

        table
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self, title: &str) {
        self.to_table(title).printstd();
    }
}

//mean over standard deviation of trade outcomes, not annualized
fn calculate_sharpe_ratio(trades: &[f64]) -> f64 {
    if trades.len() < 2 {
        return 0.0;
    }

    let mean = trades.mean();
    let std_dev = trades.std_dev();

    if std_dev == 0.0 || std_dev.is_nan() {
        return 0.0;
    }

    mean / std_dev
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mixed_outcomes() {
        let summary = SummaryMetrics::from_outcomes(&[2.0, -1.0, 0.0, 3.0, -2.0]);
        assert_eq!(summary.num_requests, 5);
        assert_eq!(summary.num_trades, 4);
        assert_eq!(summary.num_winning_trades, 2);
        assert_eq!(summary.num_losing_trades, 2);
        assert_relative_eq!(summary.win_rate, 0.5);
        assert_relative_eq!(summary.avg_win, 2.5);
        assert_relative_eq!(summary.avg_loss, -1.5);
        assert_relative_eq!(summary.largest_win, 3.0);
        assert_relative_eq!(summary.largest_loss, -2.0);
        assert_relative_eq!(summary.profit_factor, 5.0 / 3.0);
        assert_relative_eq!(summary.net_pnl, 2.0);
        assert_relative_eq!(summary.max_drawdown, 2.0);
    }

    #[test]
    fn sharpe_is_mean_over_sample_std_dev() {
        let summary = SummaryMetrics::from_outcomes(&[1.0, 3.0]);
        //mean 2, sample std dev sqrt(2)
        assert_relative_eq!(summary.sharpe_ratio, 2.0 / 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn no_trades() {
        let summary = SummaryMetrics::from_outcomes(&[0.0, 0.0]);
        assert_eq!(summary.num_trades, 0);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.profit_factor, 0.0);
        assert_eq!(summary.sharpe_ratio, 0.0);
    }

    #[test]
    fn only_winners_has_infinite_profit_factor() {
        let summary = SummaryMetrics::from_outcomes(&[1.0, 2.0]);
        assert!(summary.profit_factor.is_infinite());
        assert_eq!(summary.max_drawdown, 0.0);
    }

    #[test]
    fn table_has_a_row_per_metric() {
        let table = SummaryMetrics::from_outcomes(&[1.0, -1.0]).to_table("Long");
        assert_eq!(table.len(), 12);
    }
}
