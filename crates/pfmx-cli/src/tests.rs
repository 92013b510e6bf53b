use super::*;

#[test]
fn parses_report_with_defaults() {
    let cli = Cli::try_parse_from(["pfmx", "report", "--id", "26304"]).expect("valid cli args");

    let Commands::Report {
        source,
        period,
        from,
        to,
        step,
        ids,
        metrics,
        json,
    } = cli.command
    else {
        panic!("expected report command");
    };
    assert_eq!(source, Source::Shops);
    assert_eq!(period, NamedPeriod::LastWeek);
    assert!(from.is_none() && to.is_none());
    assert_eq!(step, PeriodStep::Day);
    assert_eq!(ids, vec![26304]);
    assert!(metrics.is_empty());
    assert!(!json);
}

#[test]
fn parses_repeated_ids_and_metrics() {
    let cli = Cli::try_parse_from([
        "pfmx",
        "report",
        "--period",
        "last_month",
        "--id",
        "26304",
        "--id",
        "26305",
        "--metric",
        "turnover",
        "--metric",
        "count_in",
        "--json",
    ])
    .expect("valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Report {
            period: NamedPeriod::LastMonth,
            ref ids,
            ref metrics,
            json: true,
            ..
        } if ids == &[26304, 26305] && metrics == &[Metric::Turnover, Metric::CountIn]
    ));
}

#[test]
fn parses_explicit_range() {
    let cli = Cli::try_parse_from([
        "pfmx", "report", "--id", "1", "--from", "2024-06-01", "--to", "2024-06-30", "--step",
        "week",
    ])
    .expect("valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Report {
            from: Some(_),
            to: Some(_),
            step: PeriodStep::Week,
            ..
        }
    ));
}

#[test]
fn from_without_to_is_rejected() {
    let result = Cli::try_parse_from(["pfmx", "report", "--id", "1", "--from", "2024-06-01"]);
    assert!(result.is_err());
}

#[test]
fn report_requires_an_id() {
    assert!(Cli::try_parse_from(["pfmx", "report"]).is_err());
}

#[test]
fn unknown_source_is_rejected() {
    let result = Cli::try_parse_from(["pfmx", "report", "--id", "1", "--source", "regions"]);
    assert!(result.is_err());
}

#[test]
fn parses_live_watch() {
    let cli = Cli::try_parse_from([
        "pfmx", "live", "--id", "37953", "--capacity", "120", "--watch", "30",
    ])
    .expect("valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Live {
            source: Source::Zones,
            capacity: Some(120),
            watch: Some(30),
            ..
        }
    ));
}

#[test]
fn parses_smoke() {
    let cli = Cli::try_parse_from(["pfmx", "smoke", "--id", "26304"]).expect("valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Smoke {
            id: 26304,
            live_source: Source::Locations
        }
    ));
}
