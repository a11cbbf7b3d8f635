//! VTK output for forcing fields.
//!
//! Writes one regridded field as a VTU (XML UnstructuredGrid) file for
//! inspection in ParaView. Each grid cell center becomes a VTK point at its
//! (lon, lat) position and adjacent centers are connected into quads, so
//! rotated grids render with their true orientation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::field::Field2D;
use crate::grid::Grid;

/// Error type for VTK operations.
#[derive(Debug, Error)]
pub enum VtkError {
    /// I/O error during file operations.
    #[error("VTK I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Field shape does not match the grid.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// VTK XML writer helper.
struct VtkWriter<W: Write> {
    writer: BufWriter<W>,
    indent: usize,
}

impl<W: Write> VtkWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            indent: 0,
        }
    }

    fn write_indent(&mut self) -> std::io::Result<()> {
        for _ in 0..self.indent {
            write!(self.writer, "  ")?;
        }
        Ok(())
    }

    fn write_header(&mut self) -> std::io::Result<()> {
        writeln!(self.writer, "<?xml version=\"1.0\"?>")?;
        writeln!(
            self.writer,
            "<VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">"
        )?;
        self.indent += 1;
        Ok(())
    }

    fn write_footer(&mut self) -> std::io::Result<()> {
        self.indent -= 1;
        writeln!(self.writer, "</VTKFile>")?;
        self.writer.flush()?;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> std::io::Result<()> {
        self.write_indent()?;
        write!(self.writer, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.writer, " {}=\"{}\"", key, value)?;
        }
        writeln!(self.writer, ">")?;
        self.indent += 1;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> std::io::Result<()> {
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</{}>", name)?;
        Ok(())
    }

    /// Emit one named DataArray. `per_line` breaks long runs for
    /// readability; `fmt` renders each value.
    fn write_data_array<T: Copy>(
        &mut self,
        dtype: &str,
        name: &str,
        data: &[T],
        per_line: usize,
        fmt: impl Fn(T) -> String,
    ) -> std::io::Result<()> {
        self.write_indent()?;
        writeln!(
            self.writer,
            "<DataArray type=\"{}\" Name=\"{}\" format=\"ascii\">",
            dtype, name
        )?;

        self.indent += 1;
        self.write_indent()?;
        for (i, &v) in data.iter().enumerate() {
            write!(self.writer, "{}", fmt(v))?;
            if i < data.len() - 1 {
                write!(self.writer, " ")?;
            }
            if (i + 1) % per_line == 0 && i < data.len() - 1 {
                writeln!(self.writer)?;
                self.write_indent()?;
            }
        }
        writeln!(self.writer)?;
        self.indent -= 1;

        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")?;
        Ok(())
    }

    fn write_points(&mut self, points: &[(f64, f64)]) -> std::io::Result<()> {
        self.start_element("Points", &[])?;

        self.write_indent()?;
        writeln!(
            self.writer,
            "<DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">"
        )?;

        self.indent += 1;
        self.write_indent()?;
        for (i, &(x, y)) in points.iter().enumerate() {
            write!(self.writer, "{:.10e} {:.10e} 0.0", x, y)?;
            if i < points.len() - 1 {
                write!(self.writer, " ")?;
            }
            if (i + 1) % 2 == 0 && i < points.len() - 1 {
                writeln!(self.writer)?;
                self.write_indent()?;
            }
        }
        writeln!(self.writer)?;
        self.indent -= 1;

        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")?;

        self.end_element("Points")?;
        Ok(())
    }

    fn write_cells(&mut self, cells: &[[usize; 4]]) -> std::io::Result<()> {
        self.start_element("Cells", &[])?;

        // Connectivity
        let connectivity: Vec<i32> = cells
            .iter()
            .flat_map(|c| c.iter().map(|&v| v as i32))
            .collect();
        self.write_data_array("Int32", "connectivity", &connectivity, 20, |v| v.to_string())?;

        // Offsets (cumulative vertex count)
        let offsets: Vec<i32> = (1..=cells.len()).map(|i| (i * 4) as i32).collect();
        self.write_data_array("Int32", "offsets", &offsets, 20, |v| v.to_string())?;

        // Types (VTK_QUAD = 9)
        let types: Vec<u8> = vec![9; cells.len()];
        self.write_data_array("UInt8", "types", &types, 20, |v| v.to_string())?;

        self.end_element("Cells")?;
        Ok(())
    }
}

/// Write one field on the model grid to a VTU file.
///
/// Cell centers become VTK points in (lon, lat) coordinates; adjacent
/// centers form quads (counter-clockwise for VTK).
pub fn write_vtk_field(
    path: impl AsRef<Path>,
    grid: &Grid,
    name: &str,
    field: &Field2D,
) -> Result<(), VtkError> {
    if field.ny != grid.ny || field.nx != grid.nx {
        return Err(VtkError::ShapeMismatch(format!(
            "field is {}x{}, grid is {}x{}",
            field.ny, field.nx, grid.ny, grid.nx
        )));
    }

    let mut points = Vec::with_capacity(grid.ny * grid.nx);
    for j in 0..grid.ny {
        for i in 0..grid.nx {
            points.push((grid.lon.get(j, i), grid.lat.get(j, i)));
        }
    }

    let mut cells = Vec::with_capacity((grid.ny - 1) * (grid.nx - 1));
    for j in 0..grid.ny - 1 {
        for i in 0..grid.nx - 1 {
            let v0 = j * grid.nx + i;
            let v1 = j * grid.nx + i + 1;
            let v2 = (j + 1) * grid.nx + i + 1;
            let v3 = (j + 1) * grid.nx + i;
            cells.push([v0, v1, v2, v3]);
        }
    }

    let file = File::create(path)?;
    let mut writer = VtkWriter::new(file);

    writer.write_header()?;
    writer.start_element("UnstructuredGrid", &[])?;
    writer.start_element(
        "Piece",
        &[
            ("NumberOfPoints", &points.len().to_string()),
            ("NumberOfCells", &cells.len().to_string()),
        ],
    )?;

    writer.write_points(&points)?;
    writer.write_cells(&cells)?;

    writer.start_element("PointData", &[("Scalars", name)])?;
    writer.write_data_array("Float64", name, &field.data, 6, |v| format!("{:.10e}", v))?;
    writer.end_element("PointData")?;

    writer.end_element("Piece")?;
    writer.end_element("UnstructuredGrid")?;
    writer.write_footer()?;

    Ok(())
}
