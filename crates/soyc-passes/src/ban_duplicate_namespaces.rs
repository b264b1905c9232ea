//! Namespace uniqueness across a file set.
//!
//! Every file must declare its own namespace, and no template may share its
//! full name with the prefix of another file's namespace (`a.b` the
//! template and `a.b.c` the namespace would produce clashing symbols).

use crate::CompilerFileSetPass;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use soyc_common::diagnostics::diagnostic_messages;
use soyc_common::{ErrorReporter, SourceLocation};
use soyc_soytree::utils::{all_nodes_of_kind, template_full_name};
use soyc_soytree::{SoyNode, SoyNodeKind, SoyTree};
use soyc_tree::NodeId;

#[derive(Default)]
pub struct BanDuplicateNamespacesPass {
    /// Namespaces known to be shared; reported as warnings only.
    exemptions: FxHashSet<String>,
}

struct TemplateEntry {
    name: String,
    location: SourceLocation,
    file_path: String,
}

impl BanDuplicateNamespacesPass {
    pub fn new() -> Self {
        BanDuplicateNamespacesPass::default()
    }

    pub fn with_exemptions<I, S>(exemptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BanDuplicateNamespacesPass {
            exemptions: exemptions.into_iter().map(Into::into).collect(),
        }
    }

    fn check_duplicate_namespaces(
        &self,
        tree: &SoyTree,
        files: &[NodeId],
        reporter: &mut ErrorReporter,
    ) {
        let mut namespace_to_files: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for &file in files {
            if let SoyNode::File(node) = tree.payload(file) {
                if node.namespace.is_empty() {
                    continue;
                }
                let paths = namespace_to_files.entry(node.namespace.as_str()).or_default();
                if !paths.contains(&node.path.as_str()) {
                    paths.push(node.path.as_str());
                }
            }
        }

        for &file in files {
            let SoyNode::File(node) = tree.payload(file) else {
                continue;
            };
            let Some(paths) = namespace_to_files.get(node.namespace.as_str()) else {
                continue;
            };
            if paths.len() < 2 {
                continue;
            }
            let others = paths
                .iter()
                .filter(|&&path| path != node.path)
                .copied()
                .collect::<Vec<_>>()
                .join(", ");
            if self.exemptions.contains(&node.namespace) {
                reporter.warn(
                    tree.location(file),
                    &diagnostic_messages::DUPLICATE_NAMESPACE_WARNING,
                    &[&others],
                );
            } else {
                reporter.report(
                    tree.location(file),
                    &diagnostic_messages::DUPLICATE_NAMESPACE,
                    &[&others],
                );
            }
        }
    }

    /// Sorted by name, a template that is a prefix of another template's
    /// namespace is immediately followed by one of its templates.
    fn check_namespace_collisions(
        &self,
        tree: &SoyTree,
        files: &[NodeId],
        reporter: &mut ErrorReporter,
    ) {
        let mut templates: Vec<TemplateEntry> = Vec::new();
        for &file in files {
            let file_path = match tree.payload(file) {
                SoyNode::File(node) => node.path.clone(),
                _ => continue,
            };
            for template in all_nodes_of_kind(tree, file, SoyNodeKind::Template) {
                templates.push(TemplateEntry {
                    name: template_full_name(tree, template),
                    location: tree.location(template).clone(),
                    file_path: file_path.clone(),
                });
            }
        }
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates.dedup_by(|next, last| next.name == last.name);

        for pair in templates.windows(2) {
            let [last, next] = pair else {
                continue;
            };
            let is_prefix = next
                .name
                .strip_prefix(last.name.as_str())
                .is_some_and(|rest| rest.starts_with('.'));
            if is_prefix {
                let namespace = next
                    .name
                    .rsplit_once('.')
                    .map_or(next.name.as_str(), |(namespace, _)| namespace);
                reporter.report(
                    &last.location,
                    &diagnostic_messages::NAMESPACE_COLLISION,
                    &[&last.name, namespace, &next.file_path],
                );
            }
        }
    }
}

impl CompilerFileSetPass for BanDuplicateNamespacesPass {
    fn name(&self) -> &'static str {
        "BanDuplicateNamespaces"
    }

    fn run(&mut self, tree: &mut SoyTree, files: &[NodeId], reporter: &mut ErrorReporter) {
        self.check_duplicate_namespaces(tree, files, reporter);
        self.check_namespace_collisions(tree, files, reporter);
    }
}
