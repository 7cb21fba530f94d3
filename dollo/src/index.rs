//! Mapping between unresolved matrix cells and oracle variables.
use crate::{lit::Var, matrix::Matrix};

/// Bidirectional mapping from unresolved ("active") matrix cells to densely
/// packed decision variables.
///
/// Variables are assigned in row-major cell order, so two runs over the same
/// input always produce the same encoding. Built once before solving and
/// immutable afterwards.
pub struct VarIndex {
    characters: usize,
    var_of: Vec<Option<Var>>,
    cell_of: Vec<(usize, usize)>,
}

impl VarIndex {
    /// Scans the matrix and assigns one variable per unresolved cell.
    pub fn new(matrix: &Matrix) -> VarIndex {
        let characters = matrix.characters();
        let mut var_of = Vec::with_capacity(matrix.taxa() * characters);
        let mut cell_of = vec![];

        for taxon in 0..matrix.taxa() {
            for character in 0..characters {
                if matrix.get(taxon, character) == Matrix::UNRESOLVED {
                    var_of.push(Some(Var::from_index(cell_of.len())));
                    cell_of.push((taxon, character));
                } else {
                    var_of.push(None);
                }
            }
        }

        VarIndex {
            characters,
            var_of,
            cell_of,
        }
    }

    /// Number of active cells, equal to the number of variables to allocate.
    pub fn var_count(&self) -> usize {
        self.cell_of.len()
    }

    /// The variable of a cell, or `None` when the cell is fixed by the input.
    #[inline]
    pub fn var(&self, taxon: usize, character: usize) -> Option<Var> {
        self.var_of[taxon * self.characters + character]
    }

    /// Whether the cell is represented by a decision variable.
    #[inline]
    pub fn is_active(&self, taxon: usize, character: usize) -> bool {
        self.var(taxon, character).is_some()
    }

    /// The cell a variable stands for.
    pub fn cell(&self, var: Var) -> (usize, usize) {
        self.cell_of[var.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_row_major_indices() {
        let matrix = Matrix::from_rows(&[&[1, 0], &[2, 1], &[1, 1]]);
        let index = VarIndex::new(&matrix);

        assert_eq!(index.var_count(), 4);
        assert_eq!(index.var(0, 0), Some(Var::from_index(0)));
        assert_eq!(index.var(1, 1), Some(Var::from_index(1)));
        assert_eq!(index.var(2, 0), Some(Var::from_index(2)));
        assert_eq!(index.var(2, 1), Some(Var::from_index(3)));
    }

    #[test]
    fn fixed_cells_have_no_variable() {
        let matrix = Matrix::from_rows(&[&[1, 0], &[2, 1]]);
        let index = VarIndex::new(&matrix);

        assert!(index.is_active(0, 0));
        assert!(!index.is_active(0, 1));
        assert!(!index.is_active(1, 0));
    }

    #[test]
    fn variables_map_back_to_their_cells() {
        let matrix = Matrix::from_rows(&[&[1, 0], &[2, 1], &[0, 1]]);
        let index = VarIndex::new(&matrix);

        for var_index in 0..index.var_count() {
            let (taxon, character) = index.cell(Var::from_index(var_index));
            assert_eq!(index.var(taxon, character), Some(Var::from_index(var_index)));
        }
    }

    #[test]
    fn complete_matrix_needs_no_variables() {
        let matrix = Matrix::from_rows(&[&[0, 2], &[2, 0]]);
        assert_eq!(VarIndex::new(&matrix).var_count(), 0);
    }
}
