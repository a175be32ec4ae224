use alloc::string::String;
use alloc::vec::Vec;

use crate::Dom;
use crate::key::FragmentMap;

/// One navigation link and the section it points to.
#[derive(Clone, Debug, PartialEq)]
pub struct Target<N> {
    /// The link's fragment reference, e.g. `#intro`.
    pub fragment: String,
    pub link: N,
    pub section: N,
}

/// Parallel `fragment → link` and `fragment → section` mappings, in navigation order.
///
/// Rebuilt wholesale on every refresh. A fragment appears at most once: when several links
/// share a fragment, the last link wins but the first one's position is kept.
#[derive(Clone, Debug)]
pub struct TargetIndex<N> {
    targets: Vec<Target<N>>,
    by_fragment: FragmentMap,
}

impl<N> Default for TargetIndex<N> {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            by_fragment: FragmentMap::new(),
        }
    }
}

impl<N: Clone + PartialEq> TargetIndex<N> {
    /// Scans every link-like element under `nav_root` and keeps those whose fragment resolves
    /// to a section inside `container`.
    ///
    /// Links without a fragment, disabled links, and links whose fragment has no matching
    /// section are skipped silently. An empty index is valid.
    pub fn build<D: Dom<Node = N>>(dom: &D, nav_root: &N, container: &N) -> Self {
        let mut index = Self::default();
        for link in dom.descendants(nav_root) {
            let Some(fragment) = dom.link_fragment(&link) else {
                continue;
            };
            if dom.is_disabled(&link) {
                continue;
            }
            let Some(section) = dom.find_by_id(container, &fragment[1..]) else {
                sstrace!(fragment = %fragment, "TargetIndex: no section for fragment");
                continue;
            };
            index.insert(fragment, link, section);
        }
        index
    }

    fn insert(&mut self, fragment: String, link: N, section: N) {
        if let Some(&i) = self.by_fragment.get(&fragment) {
            let target = &mut self.targets[i];
            target.link = link;
            target.section = section;
            return;
        }
        self.by_fragment.insert(fragment.clone(), self.targets.len());
        self.targets.push(Target {
            fragment,
            link,
            section,
        });
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Target<N>> {
        self.targets.iter()
    }

    pub fn get(&self, fragment: &str) -> Option<&Target<N>> {
        self.by_fragment.get(fragment).map(|&i| &self.targets[i])
    }

    pub fn link(&self, fragment: &str) -> Option<&N> {
        self.get(fragment).map(|t| &t.link)
    }

    pub fn section(&self, fragment: &str) -> Option<&N> {
        self.get(fragment).map(|t| &t.section)
    }

    /// The link registered for a section, looked up through the section's `id`.
    pub fn link_for_section<D: Dom<Node = N>>(&self, dom: &D, section: &N) -> Option<&N> {
        let id = dom.element_id(section)?;
        self.link(&alloc::format!("#{id}"))
    }

    pub fn contains_link(&self, link: &N) -> bool {
        self.targets.iter().any(|t| t.link == *link)
    }

    /// Sections in navigation order.
    pub fn sections(&self) -> impl Iterator<Item = &N> + '_ {
        self.targets.iter().map(|t| &t.section)
    }
}

impl<'a, N> IntoIterator for &'a TargetIndex<N> {
    type Item = &'a Target<N>;
    type IntoIter = core::slice::Iter<'a, Target<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
