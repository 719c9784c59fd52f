//! The result of a successful check.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use sheaf_diagnostic::Diagnostic;
use sheaf_ir::{Expr, NodeId};
use sheaf_types::DataType;
use sheaf_value::{ColumnInfo, FunctionValue, TableInfo, Value};

/// A resolved reference to one tag of a tagged type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRef {
    pub type_name: String,
    pub tag: String,
    /// Position of the tag in its type's declaration; orders tagged values.
    pub index: usize,
    pub has_payload: bool,
}

/// What the checker settled for one node.
#[derive(Clone, Debug)]
pub enum Resolution {
    /// Literal value, computed once.
    Constant(Value),
    /// An identifier naming a bound variable.
    Variable,
    /// An identifier in pattern position that binds a new variable.
    Binding,
    /// An identifier or `@tag` naming a tag.
    Tag(TagRef),
    /// An identifier naming a standard function, instantiated for its
    /// call site.
    Function(FunctionValue),
    Column(ColumnInfo),
    EntireColumn(ColumnInfo),
    Table(TableInfo),
    /// A lambda node, shared with the closures built from it.
    Lambda(Arc<Expr>),
}

/// A function argument containing `?`, evaluated as a lambda with one
/// parameter per `?`.
#[derive(Clone, Debug)]
pub struct ImplicitLambda {
    /// The `?` nodes, in source order.
    pub params: Vec<NodeId>,
    /// The argument itself.
    pub body: Arc<Expr>,
}

/// Variable name under which the value of the `?` node `id` is bound.
pub fn implicit_arg_name(id: NodeId) -> String {
    format!("?{}", id.raw())
}

/// A checked formula: the tree plus everything evaluation needs to know
/// about it.
///
/// Immutable once built and cheap to clone, so any number of rows can be
/// evaluated from it in parallel.
#[derive(Clone, Debug)]
pub struct CheckedExpression {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    expr: Expr,
    ty: DataType,
    resolutions: FxHashMap<NodeId, Resolution>,
    implicit_lambdas: FxHashMap<NodeId, ImplicitLambda>,
    types: FxHashMap<NodeId, DataType>,
    notes: Vec<Diagnostic>,
}

impl CheckedExpression {
    pub(crate) fn new(
        expr: Expr,
        ty: DataType,
        resolutions: FxHashMap<NodeId, Resolution>,
        implicit_lambdas: FxHashMap<NodeId, ImplicitLambda>,
        types: FxHashMap<NodeId, DataType>,
        notes: Vec<Diagnostic>,
    ) -> Self {
        CheckedExpression {
            inner: Arc::new(Inner {
                expr,
                ty,
                resolutions,
                implicit_lambdas,
                types,
                notes,
            }),
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.inner.expr
    }

    /// Type of the whole formula.
    pub fn ty(&self) -> &DataType {
        &self.inner.ty
    }

    pub fn resolution(&self, node: NodeId) -> Option<&Resolution> {
        self.inner.resolutions.get(&node)
    }

    pub fn implicit_lambda(&self, node: NodeId) -> Option<&ImplicitLambda> {
        self.inner.implicit_lambdas.get(&node)
    }

    /// Concrete type of `node`, if its type was fully worked out.
    pub fn type_of(&self, node: NodeId) -> Option<&DataType> {
        self.inner.types.get(&node)
    }

    /// Information recorded during the check, such as inferred units.
    pub fn notes(&self) -> &[Diagnostic] {
        &self.inner.notes
    }
}
