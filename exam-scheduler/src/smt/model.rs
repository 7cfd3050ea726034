use fnv::FnvHashMap;

use super::SmtVariable;

/// An assignment of integer values to variables, as returned by an SMT oracle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SmtModel {
    values: FnvHashMap<SmtVariable, i64>,
}

impl SmtModel {
    pub fn assign(&mut self, variable: SmtVariable, value: i64) {
        let _ = self.values.insert(variable, value);
    }

    pub fn value(&self, variable: SmtVariable) -> Option<i64> {
        self.values.get(&variable).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SmtVariable, i64)> + '_ {
        self.values.iter().map(|(&variable, &value)| (variable, value))
    }
}

impl FromIterator<(SmtVariable, i64)> for SmtModel {
    fn from_iter<T: IntoIterator<Item = (SmtVariable, i64)>>(iter: T) -> Self {
        SmtModel {
            values: iter.into_iter().collect(),
        }
    }
}
