use crate::color::{ColorId, VertexId};

/// sentinel for "not in any list"
const ABSENT: usize = usize::MAX;

/** partial mapping vertex → color, indexed both ways.

Besides the color of each vertex, it maintains the member list of every color
class (swap-delete vectors plus the position of each vertex within its list)
and the list of colors currently in use. Every operation is O(1) amortized;
colors whose class becomes empty disappear from `values()`. */
#[derive(Debug, Clone)]
pub struct DoublyIndexedMap {
    /// element_values[v]: color of v, if any
    element_values: Vec<Option<ColorId>>,
    /// element_positions[v]: index of v within its class list
    element_positions: Vec<usize>,
    /// class_elements[c]: vertices of color c
    class_elements: Vec<Vec<VertexId>>,
    /// colors currently in use (order unspecified)
    values: Vec<ColorId>,
    /// value_positions[c]: index of c within `values` (ABSENT if unused)
    value_positions: Vec<usize>,
    /// number of mapped vertices
    nb_elements: usize,
}

impl DoublyIndexedMap {
    /// creates an empty map for `nb_elements` vertices and colors in [0, nb_values)
    pub fn new(nb_elements: usize, nb_values: usize) -> Self {
        Self {
            element_values: vec![None; nb_elements],
            element_positions: vec![ABSENT; nb_elements],
            class_elements: vec![Vec::new(); nb_values],
            values: Vec::new(),
            value_positions: vec![ABSENT; nb_values],
            nb_elements: 0,
        }
    }

    /// true iff v is mapped
    pub fn contains(&self, v: VertexId) -> bool { self.element_values[v].is_some() }

    /// color of v, if any
    pub fn value(&self, v: VertexId) -> Option<ColorId> { self.element_values[v] }

    /// number of mapped vertices
    pub fn nb_elements(&self) -> usize { self.nb_elements }

    /// number of vertices of color c
    pub fn nb_elements_of(&self, c: ColorId) -> usize { self.class_elements[c].len() }

    /// number of colors currently in use
    pub fn nb_values(&self) -> usize { self.values.len() }

    /// colors currently in use
    pub fn values(&self) -> &[ColorId] { &self.values }

    /// vertices of color c
    pub fn elements_of(&self, c: ColorId) -> &[VertexId] { &self.class_elements[c] }

    /// maps v to color c (replacing any previous color)
    pub fn set(&mut self, v: VertexId, c: ColorId) {
        match self.element_values[v] {
            Some(old) if old == c => return,
            Some(old) => self.remove_from_class(v, old),
            None => self.nb_elements += 1,
        }
        if self.class_elements[c].is_empty() {
            self.value_positions[c] = self.values.len();
            self.values.push(c);
        }
        self.element_positions[v] = self.class_elements[c].len();
        self.class_elements[c].push(v);
        self.element_values[v] = Some(c);
    }

    /// removes the color of v, if any
    pub fn unset(&mut self, v: VertexId) {
        if let Some(old) = self.element_values[v] {
            self.remove_from_class(v, old);
            self.element_values[v] = None;
            self.element_positions[v] = ABSENT;
            self.nb_elements -= 1;
        }
    }

    /// swap-deletes v from class c; drops c from `values` if it empties
    fn remove_from_class(&mut self, v: VertexId, c: ColorId) {
        let class = &mut self.class_elements[c];
        let i = self.element_positions[v];
        let last = class.len() - 1;
        class.swap(i, last);
        self.element_positions[class[i]] = i;
        class.pop();
        if class.is_empty() {
            let j = self.value_positions[c];
            let last_value = self.values.len() - 1;
            self.values.swap(j, last_value);
            self.value_positions[self.values[j]] = j;
            self.values.pop();
            self.value_positions[c] = ABSENT;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_queries() {
        let mut map = DoublyIndexedMap::new(4, 4);
        assert_eq!(map.nb_elements(), 0);
        assert_eq!(map.nb_values(), 0);
        map.set(0, 2);
        map.set(1, 2);
        map.set(2, 0);
        assert_eq!(map.nb_elements(), 3);
        assert_eq!(map.nb_values(), 2);
        assert_eq!(map.value(0), Some(2));
        assert_eq!(map.nb_elements_of(2), 2);
        assert_eq!(map.nb_elements_of(0), 1);
        assert!(!map.contains(3));
    }

    #[test]
    fn test_overwrite_drops_empty_class() {
        let mut map = DoublyIndexedMap::new(3, 3);
        map.set(0, 1);
        map.set(0, 2); // color 1 now empty
        assert_eq!(map.nb_elements(), 1);
        assert_eq!(map.nb_values(), 1);
        assert_eq!(map.values(), &[2]);
        assert_eq!(map.nb_elements_of(1), 0);
    }

    #[test]
    fn test_unset() {
        let mut map = DoublyIndexedMap::new(3, 3);
        map.set(0, 0);
        map.set(1, 0);
        map.unset(0);
        assert_eq!(map.nb_elements(), 1);
        assert_eq!(map.value(0), None);
        assert_eq!(map.elements_of(0), &[1]);
        map.unset(1);
        assert_eq!(map.nb_values(), 0);
        // unset of an unmapped vertex is a no-op
        map.unset(2);
        assert_eq!(map.nb_elements(), 0);
    }

    #[test]
    fn test_swap_delete_keeps_positions_consistent() {
        let mut map = DoublyIndexedMap::new(5, 5);
        for v in 0..5 { map.set(v, 0); }
        map.unset(1); // 4 swapped into position of 1
        map.unset(4);
        let mut members = map.elements_of(0).to_vec();
        members.sort_unstable();
        assert_eq!(members, vec![0, 2, 3]);
    }
}
