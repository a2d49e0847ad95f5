// Tests for data import, range selection and display grids

use std::io::Write;

use ndarray::array;
use xyfit_rs::data::parse_table;
use xyfit_rs::{CurveFit, DataSet, FitError, ModelFunction};

const TABLE: &str = "\
# Calibration run
# x     dx     y      dy
0.5,  0.02, 3.49, 0.1
1.0;  0.02, 5.01; 0.1
1.5   0.02  6.52  0.1
2.0\t0.02\t7.98\t0.1

2.5   0.02  9.51  0.1
";

#[test]
fn test_parse_mixed_separators() {
    let data = parse_table(TABLE).unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data.x(), &array![0.5, 1.0, 1.5, 2.0, 2.5]);
    assert_eq!(data.y()[1], 5.01);
    assert!(data.dx().iter().all(|&dx| dx == 0.02));
}

#[test]
fn test_malformed_row_reports_line_number() {
    let text = "# header\n1 0.1 2 0.1\n2 0.1 x 0.1\n";
    match parse_table(text) {
        Err(FitError::ParseError { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("2 0.1 x 0.1"));
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_from_reader_and_path() {
    let data = DataSet::from_reader(TABLE.as_bytes()).unwrap();
    assert_eq!(data.len(), 5);

    let path = std::env::temp_dir().join(format!("xyfit-table-{}.txt", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();
    }
    let from_file = DataSet::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(from_file, data);

    assert!(matches!(
        DataSet::from_path("/nonexistent/xyfit/table.txt"),
        Err(FitError::IoError(_))
    ));
}

#[test]
fn test_fit_selected_range() {
    // The last two points do not follow the line
    let data = DataSet::from_rows(&[
        [-1.0, 0.0, -1.0, 0.1],
        [-0.5, 0.0, 0.5, 0.1],
        [0.0, 0.0, 2.0, 0.1],
        [0.5, 0.0, 3.5, 0.1],
        [1.0, 0.0, 5.0, 0.1],
        [3.0, 0.0, 40.0, 0.1],
        [4.0, 0.0, 90.0, 0.1],
    ])
    .unwrap();

    let selected = data.select_range(-1.0, 1.0).unwrap();
    assert_eq!(selected.len(), 5);

    let grid = selected.display_grid(100);
    let result = CurveFit::new()
        .fit(ModelFunction::Linear, &selected, &array![1.5, 2.5], &grid)
        .unwrap();

    assert!(result.is_converged());
    assert!((result.params[0] - 2.0).abs() < 1e-2);
    assert!((result.params[1] - 3.0).abs() < 1e-2);
    assert_eq!(result.degrees_of_freedom, 3);
}

#[test]
fn test_display_grid_follows_data() {
    let data = parse_table(TABLE).unwrap();
    let (lo, hi) = data.display_range();
    assert!((lo - 0.45).abs() < 1e-12);
    assert!((hi - 2.75).abs() < 1e-12);

    let grid = data.display_grid(5000);
    assert_eq!(grid.len(), 5000);
    assert!(grid.windows(2).into_iter().all(|w| w[1] > w[0]));
    assert!(grid[0] >= lo && grid[4999] < hi);
}
