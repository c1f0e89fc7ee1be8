pub mod points_io;
