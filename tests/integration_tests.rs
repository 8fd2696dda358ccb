use vehicle_charts::aggregate::{Order, Predicate, filter_by, group_and_sum, single_value_lookup};
use vehicle_charts::charts::{self, ChartConfig, ChartData, ChartKind};
use vehicle_charts::parser::{load_records, parse, read_raw_records};
use vehicle_charts::record::Period;
use vehicle_charts::taxation::TaxationClass;

const FIXTURE: &str = include_str!("fixtures/vehicles.csv");

#[test]
fn test_full_pipeline_skips_bad_rows() {
    let raw = read_raw_records(FIXTURE).expect("Failed to read fixture");
    assert_eq!(raw.len(), 19);

    // One bad month, one unknown class
    let records = parse(&raw);
    assert_eq!(records.len(), 17);
    assert!(records.iter().all(|r| r.value.is_finite() && r.value >= 0.0));
}

#[test]
fn test_first_month_totals_by_year() {
    let records = load_records(FIXTURE).unwrap();
    let january = filter_by(&records, &Predicate::MonthOfYear(1));
    let classes = [TaxationClass::NewPrivateCars, TaxationClass::NewGoodsVehicles];
    let points = group_and_sum(&january, |r| r.year(), &classes, Order::FirstSeen);

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].key, 2019);
    assert_eq!(points[0].value(TaxationClass::NewGoodsVehicles), 4617.0);
    assert_eq!(points[1].key, 2020);
    assert_eq!(points[1].value(TaxationClass::NewGoodsVehicles), 0.0);
    assert_eq!(points[1].value(TaxationClass::NewPrivateCars), 23464.0);
}

#[test]
fn test_single_value_lookup_over_fixture() {
    let records = load_records(FIXTURE).unwrap();
    assert_eq!(single_value_lookup(&records, TaxationClass::NewGoodsVehicles), 4617.0);
    assert_eq!(single_value_lookup(&records, TaxationClass::ExemptVehicles), 0.0);
}

#[test]
fn test_all_five_charts_from_fixture() {
    let records = load_records(FIXTURE).unwrap();

    let doughnut = charts::doughnut(
        &records,
        charts::DEFAULT_DOUGHNUT_PERIOD,
        &ChartConfig::default_for(ChartKind::Doughnut),
    );
    assert_eq!(doughnut.y_max, 27451.0);

    let bar = charts::bar(&records, &ChartConfig::default_for(ChartKind::Bar));
    assert_eq!(bar.data.len(), 2);

    let line = charts::line(
        &records,
        charts::DEFAULT_LINE_SINCE,
        &ChartConfig::default_for(ChartKind::Line),
    );
    let ChartData::Line(points) = &line.data else {
        panic!("expected line data");
    };
    let periods: Vec<String> = points.iter().map(|p| p.period.to_string()).collect();
    assert_eq!(periods, vec!["2018M12", "2019M01", "2019M02", "2020M01"]);

    let pie = charts::pie(&records, 2019, &ChartConfig::default_for(ChartKind::Pie));
    assert_eq!(pie.data.len(), 2);
    assert_eq!(charts::pie_years(&records), vec![2019, 2020]);

    let scatter = charts::scatter(&records, &ChartConfig::default_for(ChartKind::Scatter));
    assert_eq!(scatter.data.len(), 4);
    assert_eq!(scatter.y_max, 312.0);
    assert_eq!(scatter.x_min, Period::new(2019, 1));
    assert_eq!(scatter.x_max, Period::new(2019, 2));
}

#[test]
fn test_empty_window_yields_empty_series() {
    let records = load_records(FIXTURE).unwrap();
    let future = Period::new(2031, 1).unwrap();
    let line = charts::line(&records, future, &ChartConfig::default_for(ChartKind::Line));
    assert!(line.data.is_empty());
    assert_eq!(line.y_max, 0.0);
}

#[test]
fn test_code_and_label_columns_side_by_side() {
    let text = "\
Month,Taxation_Class,Taxation Class,UNIT,VALUE
2019M01,New_Private_Cars,New private cars,Number,27451
2019M01,New_Goods_Vehicles,New goods vehicles,Number,4617
";
    let records = load_records(text).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(single_value_lookup(&records, TaxationClass::NewGoodsVehicles), 4617.0);
}
