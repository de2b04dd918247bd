use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use tessel_mesh::{FaceId, Mesh};

use crate::classify::{Strategy, group_by_default};
use crate::error::{GrammarError, GrammarResult};
use crate::tag::Tag;

/// Successor rule for one tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Tags handed to `group_children`, in strategy argument order.
    pub divide_to: Vec<Tag>,
    /// Terminal tag for faces that were eligible but not divided.
    pub undivided: Tag,
    pub group_children: Strategy,
}

impl Rule {
    pub fn new(divide_to: &[Tag], undivided: Tag, group_children: Strategy) -> GrammarResult<Rule> {
        group_children.check_arity(divide_to)?;
        Ok(Rule {
            divide_to: divide_to.to_vec(),
            undivided,
            group_children,
        })
    }

    /// Tags each parent's children with this rule's strategy and every undivided
    /// face with the terminal tag. Arity is checked before any tag is written.
    pub fn classify(
        &self,
        mesh: &mut Mesh,
        children: &[Vec<FaceId>],
        undivided: &[FaceId],
    ) -> GrammarResult<()> {
        self.group_children.check_arity(&self.divide_to)?;
        for kids in children {
            self.group_children.apply(mesh, kids, &self.divide_to)?;
        }
        group_by_default(mesh, undivided, self.undivided);
        Ok(())
    }

    /// [`Rule::classify`] as a `classify_op` for [`crate::subdivide`].
    pub fn classifier(
        &self,
    ) -> impl Fn(&mut Mesh, &[Vec<FaceId>], &[FaceId]) -> GrammarResult<()> + '_ {
        move |mesh: &mut Mesh, children: &[Vec<FaceId>], undivided: &[FaceId]| {
            self.classify(mesh, children, undivided)
        }
    }
}

/// Immutable tag → rule table. Tags without a rule are terminals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grammar {
    rules: BTreeMap<Tag, Rule>,
}

#[derive(Debug, Deserialize)]
struct GrammarFile {
    #[serde(default)]
    rules: BTreeMap<String, RuleDef>,
}

#[derive(Debug, Deserialize)]
struct RuleDef {
    divide_to: Vec<String>,
    undivided: String,
    group_children: String,
}

fn builtin_rules() -> GrammarResult<Grammar> {
    use Strategy::*;
    use Tag::*;
    let mut g = Grammar::default();
    g.insert(Block, Rule::new(&[Block], Plaza, Uniform)?);
    g.insert(Plot, Rule::new(&[Road, ConstructUp], Plaza, Index)?);
    g.insert(
        ConstructUp,
        Rule::new(&[ConstructUp, ConstructDown, ConstructSide], Roof, Orientation)?,
    );
    g.insert(
        ConstructSide,
        Rule::new(&[ConstructUp, ConstructDown, ConstructSide], Wall, Orientation)?,
    );
    g.insert(Wall, Rule::new(&[Panel], Facade, Uniform)?);
    g.insert(Panel, Rule::new(&[Frame, Glass], Brick, Index)?);
    g.insert(Roof, Rule::new(&[Roof], Roof, Uniform)?);
    Ok(g)
}

impl Grammar {
    /// The built-in urban grammar, built once per process.
    pub fn builtin() -> &'static Grammar {
        static BUILTIN: OnceLock<Grammar> = OnceLock::new();
        BUILTIN.get_or_init(|| builtin_rules().expect("built-in grammar is well-formed"))
    }

    pub fn insert(&mut self, tag: Tag, rule: Rule) -> Option<Rule> {
        self.rules.insert(tag, rule)
    }

    #[inline]
    pub fn rule(&self, tag: Tag) -> Option<&Rule> {
        self.rules.get(&tag)
    }

    /// Like [`Grammar::rule`] but a missing rule is a configuration error.
    pub fn resolve(&self, tag: Tag) -> GrammarResult<&Rule> {
        self.rule(tag)
            .ok_or_else(|| GrammarError::config(format!("no rule for tag {tag}")))
    }

    #[inline]
    pub fn is_terminal(&self, tag: Tag) -> bool {
        !self.rules.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, &Rule)> {
        self.rules.iter().map(|(t, r)| (*t, r))
    }

    /// Tags reachable from `root` through `divide_to` and `undivided`, in
    /// breadth-first order starting with `root`.
    pub fn reachable(&self, root: Tag) -> Vec<Tag> {
        let mut seen = BTreeSet::from([root]);
        let mut order = vec![root];
        let mut queue = VecDeque::from([root]);
        while let Some(tag) = queue.pop_front() {
            let Some(rule) = self.rule(tag) else { continue };
            for &next in rule.divide_to.iter().chain(std::iter::once(&rule.undivided)) {
                if seen.insert(next) {
                    order.push(next);
                    queue.push_back(next);
                }
            }
        }
        order
    }

    /// Checks every rule reachable from `root`: each strategy must receive as many
    /// tags as it consumes. Returns the reachable tags.
    pub fn check_resolvable(&self, root: Tag) -> GrammarResult<Vec<Tag>> {
        let tags = self.reachable(root);
        for &tag in &tags {
            if let Some(rule) = self.rule(tag) {
                rule.group_children.check_arity(&rule.divide_to).map_err(|e| {
                    GrammarError::config(format!("rule {tag}: {e}"))
                })?;
            }
        }
        Ok(tags)
    }

    /// Parses `[rules.<tag>]` tables. Tag names, strategy names and strategy arity
    /// are validated.
    pub fn from_toml_str(src: &str) -> GrammarResult<Grammar> {
        let file: GrammarFile = toml::from_str(src)?;
        let mut g = Grammar::default();
        for (name, def) in file.rules {
            let tag: Tag = name.parse()?;
            let divide_to = def
                .divide_to
                .iter()
                .map(|s| s.parse::<Tag>())
                .collect::<GrammarResult<Vec<_>>>()?;
            let undivided: Tag = def.undivided.parse()?;
            let strategy: Strategy = def.group_children.parse()?;
            let rule = Rule::new(&divide_to, undivided, strategy)
                .map_err(|e| GrammarError::config(format!("rule {tag}: {e}")))?;
            g.insert(tag, rule);
        }
        log::debug!("parsed grammar with {} rule(s)", g.len());
        Ok(g)
    }

    pub fn load(path: impl AsRef<Path>) -> GrammarResult<Grammar> {
        let src = fs::read_to_string(path.as_ref())?;
        let g = Self::from_toml_str(&src)?;
        log::info!("loaded grammar {} ({} rules)", path.as_ref().display(), g.len());
        Ok(g)
    }
}
