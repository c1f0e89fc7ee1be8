//! Local file import/export for the point collection.

use std::io;
use std::path::Path;

use crate::error::AppResult;
use crate::state::point::Point;

/// Write `points` as a pretty-printed JSON array.
pub fn save_points_json(path: &Path, points: &[Point]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(points)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a JSON array of points. Duplicate ids are resolved by the store on
/// load, not here.
pub fn load_points_json(path: &Path) -> AppResult<Vec<Point>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Write `id,x,y` rows with a header line.
pub fn write_points_csv<W: io::Write>(writer: W, points: &[Point]) -> AppResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in points {
        wtr.serialize(point)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_points_csv(path: &Path, points: &[Point]) -> AppResult<()> {
    let file = std::fs::File::create(path)?;
    write_points_csv(io::BufWriter::new(file), points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("pointdash-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut buf = Vec::new();
        write_points_csv(&mut buf, &[Point::new("a", 1, -2), Point::new("b", 30, 4)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "id,x,y\na,1,-2\nb,30,4\n");
    }

    #[test]
    fn json_file_round_trip() {
        let path = temp_path("points.json");
        let points = vec![Point::new("a", 1, 2), Point::new("b", -3, 4)];
        save_points_json(&path, &points).unwrap();
        assert_eq!(load_points_json(&path).unwrap(), points);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_reports_bad_json_and_missing_file() {
        let path = temp_path("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_points_json(&path), Err(AppError::Json(_))));
        let _ = std::fs::remove_file(&path);

        let missing = temp_path("missing.json");
        assert!(matches!(load_points_json(&missing), Err(AppError::Io(_))));
    }
}
