//! Package variable initialization order
//!
//! Computed from syntax alone: a variable depends on every package-level
//! variable its initializer references, directly or through the bodies of
//! package-level functions it references. Variables are initialized by
//! repeatedly taking the earliest one, in declaration order, whose
//! dependencies are all initialized.
//!
//! References through methods are not followed; resolving them needs types.
//! A checker that computed the order supplies it through
//! [`checked_init_order`] instead.

use gir_common::{BridgeError, SourcePosition};
use gir_frontend::ast::{
    AssignOp, Block, Decl, DeclKeyword, Expr, ExprKind, Field, FieldList, File, FuncType,
    GenDecl, Ident, NodeId, Spec, Stmt, StmtKind, ValueSpec,
};
use gir_frontend::Initializer;
use log::trace;
use std::collections::{HashMap, HashSet};

/// One initialization step: `names = value`
#[derive(Debug, Clone, PartialEq)]
pub struct InitStep<'a> {
    pub names: Vec<&'a Ident>,
    pub value: &'a Expr,
}

/// Names referenced by an expression or function body, minus local bindings
#[derive(Default)]
struct References<'a> {
    scopes: Vec<HashSet<&'a str>>,
    found: HashSet<&'a str>,
}

impl<'a> References<'a> {
    fn bind(&mut self, name: &'a str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name);
        }
    }

    fn bind_fields(&mut self, fields: &'a FieldList) {
        for field in &fields.list {
            for name in &field.names {
                self.bind(&name.name);
            }
        }
    }

    fn bound(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn reference(&mut self, ident: &'a Ident) {
        if !self.bound(&ident.name) {
            self.found.insert(&ident.name);
        }
    }

    fn scoped(&mut self, walk: impl FnOnce(&mut Self)) {
        self.scopes.push(HashSet::new());
        walk(self);
        self.scopes.pop();
    }

    fn fields(&mut self, fields: &'a FieldList) {
        for field in &fields.list {
            self.field(field);
        }
    }

    fn field(&mut self, field: &'a Field) {
        self.expr(&field.ty);
    }

    fn signature(&mut self, func: &'a FuncType) {
        self.fields(&func.params);
        if let Some(results) = &func.results {
            self.fields(results);
        }
    }

    fn function(&mut self, func: &'a FuncType, body: &'a Block) {
        self.signature(func);
        self.scoped(|refs| {
            refs.bind_fields(&func.params);
            if let Some(results) = &func.results {
                refs.bind_fields(results);
            }
            refs.stmts(&body.statements);
        });
    }

    fn exprs(&mut self, exprs: &'a [Expr]) {
        for expr in exprs {
            self.expr(expr);
        }
    }

    fn optional(&mut self, expr: Option<&'a Expr>) {
        if let Some(expr) = expr {
            self.expr(expr);
        }
    }

    fn expr(&mut self, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Bad | ExprKind::BasicLit(_) => {}
            ExprKind::Ident(ident) => self.reference(ident),
            ExprKind::Ellipsis(element) => self.optional(element.as_deref()),
            ExprKind::FuncLit { ty, body } => self.function(ty, body),
            ExprKind::CompositeLit { ty, elements } => {
                self.optional(ty.as_deref());
                let keyed_by_value = matches!(
                    ty.as_deref().map(|t| &t.unparen().kind),
                    Some(ExprKind::MapType { .. })
                );
                for element in elements {
                    match &element.kind {
                        // A bare key outside a map literal names a struct field.
                        ExprKind::KeyValue { key, value }
                            if !keyed_by_value && key.as_ident().is_some() =>
                        {
                            self.expr(value)
                        }
                        _ => self.expr(element),
                    }
                }
            }
            ExprKind::Paren(inner) | ExprKind::Star(inner) => self.expr(inner),
            ExprKind::Selector { target, .. } => self.expr(target),
            ExprKind::Index { target, index } => {
                self.expr(target);
                self.expr(index);
            }
            ExprKind::Slice {
                target,
                low,
                high,
                max,
                ..
            } => {
                self.expr(target);
                self.optional(low.as_deref());
                self.optional(high.as_deref());
                self.optional(max.as_deref());
            }
            ExprKind::TypeAssert { target, asserted } => {
                self.expr(target);
                self.optional(asserted.as_deref());
            }
            ExprKind::Call {
                function,
                arguments,
                ..
            } => {
                self.expr(function);
                self.exprs(arguments);
            }
            ExprKind::Unary { operand, .. } => self.expr(operand),
            ExprKind::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            ExprKind::KeyValue { key, value } => {
                self.expr(key);
                self.expr(value);
            }
            ExprKind::ArrayType { length, element } => {
                self.optional(length.as_deref());
                self.expr(element);
            }
            ExprKind::StructType { fields } => self.fields(fields),
            ExprKind::FuncType(func) => self.signature(func),
            ExprKind::InterfaceType { methods, .. } => self.fields(methods),
            ExprKind::MapType { key, value } => {
                self.expr(key);
                self.expr(value);
            }
            ExprKind::ChanType { value, .. } => self.expr(value),
        }
    }

    fn stmts(&mut self, stmts: &'a [Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn block(&mut self, block: &'a Block) {
        self.scoped(|refs| refs.stmts(&block.statements));
    }

    fn optional_stmt(&mut self, stmt: Option<&'a Stmt>) {
        if let Some(stmt) = stmt {
            self.stmt(stmt);
        }
    }

    fn local_decl(&mut self, decl: &'a GenDecl) {
        for spec in &decl.specs {
            match spec {
                Spec::Value(value) => {
                    self.optional(value.ty.as_ref());
                    self.exprs(&value.values);
                    for name in &value.names {
                        self.bind(&name.name);
                    }
                }
                Spec::Type(ty) => {
                    self.bind(&ty.name.name);
                    self.expr(&ty.ty);
                }
                Spec::Import(_) => {}
            }
        }
    }

    fn stmt(&mut self, stmt: &'a Stmt) {
        match &stmt.kind {
            StmtKind::Bad | StmtKind::Empty | StmtKind::Branch { .. } => {}
            StmtKind::Decl(decl) => self.local_decl(decl),
            StmtKind::Labeled { statement, .. } => self.stmt(statement),
            StmtKind::Expr(expr) | StmtKind::Go(expr) | StmtKind::Defer(expr) => self.expr(expr),
            StmtKind::Send { channel, value } => {
                self.expr(channel);
                self.expr(value);
            }
            StmtKind::IncDec { target, .. } => self.expr(target),
            StmtKind::Assign { left, op, right } => {
                self.exprs(right);
                for target in left {
                    match (op, target.as_ident()) {
                        (AssignOp::Define, Some(ident)) => self.bind(&ident.name),
                        _ => self.expr(target),
                    }
                }
            }
            StmtKind::Return(values) => self.exprs(values),
            StmtKind::Block(block) => self.block(block),
            StmtKind::If {
                init,
                condition,
                body,
                else_branch,
            } => self.scoped(|refs| {
                refs.optional_stmt(init.as_deref());
                refs.expr(condition);
                refs.block(body);
                refs.optional_stmt(else_branch.as_deref());
            }),
            StmtKind::CaseClause { expressions, body } => {
                self.exprs(expressions);
                self.scoped(|refs| refs.stmts(body));
            }
            StmtKind::Switch { init, tag, body } => self.scoped(|refs| {
                refs.optional_stmt(init.as_deref());
                refs.optional(tag.as_ref());
                refs.block(body);
            }),
            StmtKind::TypeSwitch { init, assign, body } => self.scoped(|refs| {
                refs.optional_stmt(init.as_deref());
                refs.stmt(assign);
                refs.block(body);
            }),
            StmtKind::CommClause { comm, body } => self.scoped(|refs| {
                refs.optional_stmt(comm.as_deref());
                refs.stmts(body);
            }),
            StmtKind::Select { body } => self.block(body),
            StmtKind::For {
                init,
                condition,
                post,
                body,
            } => self.scoped(|refs| {
                refs.optional_stmt(init.as_deref());
                refs.optional(condition.as_ref());
                refs.optional_stmt(post.as_deref());
                refs.block(body);
            }),
            StmtKind::Range {
                key,
                value,
                define,
                target,
                body,
            } => {
                self.expr(target);
                self.scoped(|refs| {
                    for var in [key, value].into_iter().flatten() {
                        match (*define, var.as_ident()) {
                            (true, Some(ident)) => refs.bind(&ident.name),
                            _ => refs.expr(var),
                        }
                    }
                    refs.block(body);
                });
            }
        }
    }
}

fn references_in_expr(expr: &Expr) -> HashSet<&str> {
    let mut refs = References::default();
    refs.expr(expr);
    refs.found
}

/// A variable group waiting for initialization
struct Pending<'a> {
    step: InitStep<'a>,
    direct: HashSet<&'a str>,
}

fn pending_steps<'a>(spec: &'a ValueSpec) -> Result<Vec<Pending<'a>>, BridgeError> {
    let names = &spec.names;
    let values = &spec.values;
    if values.is_empty() {
        return Ok(Vec::new());
    }
    if names.len() == values.len() {
        return Ok(names
            .iter()
            .zip(values)
            .map(|(name, value)| Pending {
                step: InitStep {
                    names: vec![name],
                    value,
                },
                direct: references_in_expr(value),
            })
            .collect());
    }
    if values.len() == 1 {
        return Ok(vec![Pending {
            step: InitStep {
                names: names.iter().collect(),
                value: &values[0],
            },
            direct: references_in_expr(&values[0]),
        }]);
    }
    Err(BridgeError::type_error(
        format!(
            "assignment mismatch: {} variables but {} values",
            names.len(),
            values.len()
        ),
        spec.position.clone(),
    ))
}

/// Initialization order of the package made of `files`, in load order.
pub fn init_order<'a, I>(files: I) -> Result<Vec<InitStep<'a>>, BridgeError>
where
    I: IntoIterator<Item = &'a File>,
{
    let mut pending: Vec<Pending<'a>> = Vec::new();
    let mut functions: HashMap<&'a str, HashSet<&'a str>> = HashMap::new();

    for file in files {
        for decl in &file.decls {
            match decl {
                Decl::Gen(gen) if gen.keyword == DeclKeyword::Var => {
                    for spec in &gen.specs {
                        if let Spec::Value(value) = spec {
                            pending.extend(pending_steps(value)?);
                        }
                    }
                }
                Decl::Func(func) if func.receiver.is_none() && func.name.name != "init" => {
                    let mut refs = References::default();
                    match &func.body {
                        Some(body) => refs.function(&func.ty, body),
                        None => refs.signature(&func.ty),
                    }
                    functions.insert(func.name.name.as_str(), refs.found);
                }
                _ => {}
            }
        }
    }

    let variables: HashSet<&str> = pending
        .iter()
        .flat_map(|p| p.step.names.iter().map(|n| n.name.as_str()))
        .filter(|name| *name != "_")
        .collect();

    // Variable dependencies, following function references transitively.
    let dependencies: Vec<HashSet<&str>> = pending
        .iter()
        .map(|p| {
            let mut deps = HashSet::new();
            let mut visited = HashSet::new();
            let mut work: Vec<&str> = p.direct.iter().copied().collect();
            while let Some(name) = work.pop() {
                if variables.contains(name) {
                    deps.insert(name);
                } else if let Some(refs) = functions.get(name) {
                    if visited.insert(name) {
                        work.extend(refs.iter().copied());
                    }
                }
            }
            deps
        })
        .collect();

    let mut initialized: HashSet<&str> = HashSet::new();
    let mut done = vec![false; pending.len()];
    let mut order = Vec::with_capacity(pending.len());

    while order.len() < pending.len() {
        let ready = (0..pending.len())
            .find(|&i| !done[i] && dependencies[i].iter().all(|dep| initialized.contains(dep)));
        let index = match ready {
            Some(index) => index,
            None => {
                let stuck = (0..pending.len()).find(|&i| !done[i]).unwrap_or(0);
                let name = pending[stuck].step.names[0];
                return Err(BridgeError::type_error(
                    format!("initialization cycle: {} refers to itself", name.name),
                    name.position.clone(),
                ));
            }
        };
        done[index] = true;
        for name in &pending[index].step.names {
            initialized.insert(name.name.as_str());
        }
        trace!(
            "initialize {}",
            pending[index]
                .step
                .names
                .iter()
                .map(|n| n.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        order.push(pending[index].step.clone());
    }

    Ok(order)
}

fn package_value_specs<'a, I>(files: I) -> impl Iterator<Item = &'a ValueSpec>
where
    I: IntoIterator<Item = &'a File>,
{
    files
        .into_iter()
        .flat_map(|file| &file.decls)
        .filter_map(|decl| match decl {
            Decl::Gen(gen) if gen.keyword == DeclKeyword::Var => Some(&gen.specs),
            _ => None,
        })
        .flatten()
        .filter_map(|spec| match spec {
            Spec::Value(value) => Some(value),
            _ => None,
        })
}

fn unknown_node(id: NodeId) -> BridgeError {
    BridgeError::internal_error(
        format!("initializer refers to unknown node {}", id),
        SourcePosition::unspecified(),
    )
}

/// Steps of a checker-supplied `order`, resolved against the package syntax.
pub fn checked_init_order<'a, I>(
    files: I,
    order: &[Initializer],
) -> Result<Vec<InitStep<'a>>, BridgeError>
where
    I: IntoIterator<Item = &'a File>,
{
    let mut names: HashMap<NodeId, &'a Ident> = HashMap::new();
    let mut values: HashMap<NodeId, &'a Expr> = HashMap::new();
    for spec in package_value_specs(files) {
        names.extend(spec.names.iter().map(|name| (name.node_id, name)));
        values.extend(spec.values.iter().map(|value| (value.node_id, value)));
    }

    order
        .iter()
        .map(|initializer| -> Result<InitStep<'a>, BridgeError> {
            if initializer.vars.is_empty() {
                return Err(BridgeError::internal_error(
                    "initializer without variables",
                    SourcePosition::unspecified(),
                ));
            }
            let names = initializer
                .vars
                .iter()
                .map(|id| names.get(id).copied().ok_or_else(|| unknown_node(*id)))
                .collect::<Result<Vec<_>, _>>()?;
            let value = values
                .get(&initializer.value)
                .copied()
                .ok_or_else(|| unknown_node(initializer.value))?;
            Ok(InitStep { names, value })
        })
        .collect()
}
