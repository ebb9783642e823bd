//! End-to-end tests: export file -> candles -> entries -> outcomes -> summary.

use approx::assert_relative_eq;
use chrono::NaiveTime;
use std::io::Write;
use tempfile::NamedTempFile;
use trailsim::prelude::*;

const HEADER: &str = "Date, Time, Open, High, Low, Last, Volume, # of Trades\n";

fn write_export(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(HEADER.as_bytes()).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn scenario_from_export_file() {
    let file = write_export(&[
        "2020/09/01, 09:00:00.000, 100, 101, 99, 100, 10, 5",
        "2020/09/01, 09:01:00.000, 100, 106, 99, 101, 10, 5",
        "2020/09/01, 09:02:00.000, 100, 101, 94, 100, 10, 5",
    ]);

    let bars = load_sierra_csv(file.path()).unwrap();
    let candles = candles(&bars);
    assert_eq!(candles.len(), 3);

    let outcome = Simulator::default()
        .simulate_one(&candles, &TradeRequest::long(0, 8, 8, 0.25))
        .unwrap();
    assert_relative_eq!(outcome, 2.0);
}

#[test]
fn every_bar_run_with_default_config() {
    let file = write_export(&[
        "2020/09/01, 09:00:00, 100.00, 100.00, 100.00, 100.00, 10, 5",
        "2020/09/01, 09:01:00, 100.00, 106.00, 99.00, 105.00, 10, 5",
        "2020/09/01, 09:02:00, 105.00, 105.50, 90.00, 91.00, 10, 5",
        "2020/09/01, 09:03:00, 91.00, 92.00, 90.50, 91.50, 10, 5",
    ]);

    let config = SimulationConfig {
        data_path: file.path().to_path_buf(),
        stop_offset_ticks: 8,
        target_offset_ticks: 16,
        slippage_ticks: 0,
        trailing_offset_ticks: None,
        ..SimulationConfig::default()
    };

    let bars = load_sierra_csv(&config.data_path).unwrap();
    let candles = candles(&bars);
    let simulator = Simulator::new(config.trading_hours);

    let entries = config.entry_rule.select(&candles, Direction::Long).unwrap();
    assert_eq!(entries, vec![0, 1, 2, 3]);

    let long = simulator
        .simulate(&candles, &config.requests(&entries, Direction::Long))
        .unwrap();
    //bar 0: target 104 hit by bar 1; bar 1: stop 103 hit by bar 2
    //bar 2: only bar 3 remains, nothing examined; bar 3: last bar
    assert_eq!(long.len(), 4);
    assert_relative_eq!(long[0], 4.0);
    assert_relative_eq!(long[1], -2.0);
    assert_eq!(long[2], 0.0);
    assert_eq!(long[3], 0.0);

    let short = simulator
        .simulate(&candles, &config.requests(&entries, Direction::Short))
        .unwrap();
    //bar 0: stop 102 hit by bar 1's high; bar 1: target 101 hit by bar 2's low
    assert_relative_eq!(short[0], -2.0);
    assert_relative_eq!(short[1], 4.0);

    let summary = SummaryMetrics::from_outcomes(&long);
    assert_eq!(summary.num_trades, 2);
    assert_relative_eq!(summary.net_pnl, 2.0);
    assert_relative_eq!(summary.max_drawdown, 2.0);
}

#[test]
fn crossover_entries_feed_the_simulator() {
    let closes = [10.0, 10.0, 10.0, 12.0, 13.0, 14.0, 15.0, 16.0];
    let candles: Vec<Candle> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Candle::new(t(10, i as u32), c, c + 0.5, c - 0.5, c))
        .collect();

    let rule = EntryRule::Crossover {
        fast: IndicatorSpec::Ma { length: 1 },
        slow: IndicatorSpec::Ma { length: 3 },
        field: PriceField::Last,
    };
    let entries = rule.select(&candles, Direction::Long).unwrap();
    assert_eq!(entries, vec![3]);

    let template = TradeRequest::long(0, 4, 8, 0.25);
    let requests: Vec<TradeRequest> = entries.iter().map(|&i| template.at(i)).collect();
    let outcomes = Simulator::default().simulate(&candles, &requests).unwrap();
    //entry 12, target 14 is first touched by bar 5's high
    assert_relative_eq!(outcomes[0], 2.0);

    let by_bar = outcomes_by_bar(candles.len(), &entries, &outcomes);
    assert_eq!(by_bar[3], outcomes[0]);
    assert_eq!(by_bar.iter().filter(|v| **v != 0.0).count(), 1);
}

#[test]
fn config_round_trips_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");

    let config = SimulationConfig {
        directions: vec![Direction::Short],
        entry_rule: EntryRule::Crossover {
            fast: IndicatorSpec::T3 {
                length: 5,
                moving_average: MovingAverage::Exponential,
                multiplier: 0.7,
            },
            slow: IndicatorSpec::Ma { length: 20 },
            field: PriceField::High,
        },
        trading_hours: TradingHours::new(t(15, 15), t(15, 30)).unwrap(),
        ..SimulationConfig::default()
    };

    config.to_json_file(&path).unwrap();
    let loaded = SimulationConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn indicator_over_loaded_column() {
    let file = write_export(&[
        "2020/09/01, 09:00:00, 1, 1, 1, 1, 10, 5",
        "2020/09/01, 09:01:00, 2, 2, 2, 2, 10, 5",
        "2020/09/01, 09:02:00, 3, 3, 3, 3, 10, 5",
        "2020/09/01, 09:03:00, 4, 4, 4, 4, 10, 5",
        "2020/09/01, 09:04:00, 5, 5, 5, 5, 10, 5",
    ]);
    let candles = candles(&load_sierra_csv(file.path()).unwrap());
    let prices = column(&candles, PriceField::Last);

    let params = parse_params(&["length=3"]).unwrap();
    let spec = IndicatorSpec::from_params("ma", &params).unwrap();
    let values = spec.apply(&prices).unwrap();
    for (value, expected) in values.iter().zip([1.0, 1.5, 2.0, 3.0, 4.0]) {
        assert_relative_eq!(*value, expected, epsilon = 1e-12);
    }
}

#[test]
fn structural_errors_surface_to_caller() {
    let simulator = Simulator::default();
    let candles = vec![Candle::new(t(9, 0), 1.0, 1.0, 1.0, 1.0)];

    assert!(matches!(
        simulator.simulate(&candles, &[TradeRequest::long(1, 1, 1, 0.25)]),
        Err(SimError::InvalidIndex { index: 1, len: 1 })
    ));
    assert!(matches!(
        simulator.simulate(&[], &[]),
        Err(SimError::InvalidShape(_))
    ));
    assert!(matches!(
        IndicatorSpec::from_params("vwap", &IndicatorParams::new()),
        Err(SimError::UnknownIndicator(_))
    ));
}
