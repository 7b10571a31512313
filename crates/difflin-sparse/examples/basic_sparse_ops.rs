//! Basic Sparse Container Example
//!
//! This example demonstrates:
//! - Creating sparse vectors and matrices from coordinate lists
//! - Accumulating one vector into another with a joint merge
//! - Matrix slices sharing storage with their parent
//! - Out-of-place and in-place transposes
//!
//! Run with: cargo run -p difflin-sparse --example basic_sparse_ops
//! Set `RUST_LOG=difflin_sparse=debug` to see the structural events.

use difflin_core::tracing_support::{init_tracing, TracingConfig};
use difflin_sparse::{SparseMatrix, SparseVector};

fn main() -> anyhow::Result<()> {
    init_tracing(TracingConfig::default())?;

    println!("=== difflin-sparse: Basic Operations Example ===\n");

    // 1. Vectors
    println!("1. Creating two sparse vectors of dimension 5...");
    let mut a = SparseVector::new(&[1, 3], vec![2.0, 5.0], 5)?;
    let b = SparseVector::new(&[2, 3], vec![4.0, 1.0], 5)?;
    println!("   a = {}", a);
    println!("   b = {}\n", b);

    // 2. Joint merge
    println!("2. Accumulating b into a...");
    let mut it = a.joint_iter(&b)?;
    while it.ok() {
        if let Some((x, y)) = it.entry() {
            *x += *y;
        }
        it.advance();
    }
    drop(it);
    println!("   a + b = {}\n", a);

    // 3. Matrices and slices
    println!("3. Creating a 3x4 matrix and a 2x2 slice of it...");
    let m = SparseMatrix::new(
        &[0, 0, 1, 2, 2],
        &[0, 3, 1, 2, 3],
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
        3,
        4,
    )?;
    println!("{}\n", m);

    let mut s = m.slice(1, 3, 2, 4)?;
    s.set_at(0, 0, &9.0)?;
    println!("   after writing 9 through the slice:\n{}\n", m);

    // 4. Transposes
    println!("4. Transposing...");
    let t = m.t();
    println!("   t() is {}x{}:\n{}\n", t.rows(), t.cols(), t);

    let mut owned = m.clone();
    owned.tip()?;
    println!("   tip() gives the same matrix: {}", owned == t);

    if let Err(e) = s.tip() {
        println!("   a slice cannot be tipped: {}", e);
    }

    Ok(())
}
