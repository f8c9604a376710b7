use minijinja::{Environment, Value, context};

use hookgen_core::ir::Operation;
use hookgen_core::transform::NameFamily;
use hookgen_typescript::RenderError;
use hookgen_typescript::type_mapper::ts_string;

use crate::flavor::{
    CallStyle, FlavorConfig, KeyShape, MutationArg, OptionGenerics, OverrideOrder, Primitive,
    PrimitiveSet, ResultStyle, SignalSource,
};

/// The rendered bindings of one operation for one flavor, plus what the
/// enclosing module must import for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationBinding {
    /// Document location of the operation.
    pub source: String,
    /// Every identifier the code exports, in order.
    pub exports: Vec<String>,
    pub code: String,
    /// Runtime imports from the target library.
    pub values: Vec<Primitive>,
    /// Type-only imports from the target library.
    pub types: Vec<Primitive>,
    /// Helper types used from the routes module.
    pub route_helpers: Vec<&'static str>,
    pub uses_build_url: bool,
}

/// Render the key builder, option factory and wrapper for `op`.
///
/// The same algorithm serves every flavor; everything library-specific comes
/// from `flavor`.
pub fn emit_operation(
    env: &Environment<'_>,
    op: &Operation,
    names: &NameFamily,
    flavor: &FlavorConfig,
) -> Result<OperationBinding, RenderError> {
    let route = format!("{}, {}", ts_string(&op.path), ts_string(op.method.as_lower()));
    let wrapper = names.wrapper(flavor.wrapper_prefix);

    let (query, mutation, set) = if op.method.is_query() {
        (Some(query_ctx(op, names, flavor, &route)), None, &flavor.query)
    } else {
        (None, Some(mutation_ctx(op, names, flavor, &route)), &flavor.mutation)
    };

    let tmpl = env.get_template("operation.ts.j2")?;
    let code = tmpl.render(context! {
        route => op.route_key(),
        doc => op.summary.clone().or_else(|| op.description.clone()),
        deprecated => op.deprecated,
        names => Value::from_serialize(names),
        wrapper => wrapper.clone(),
        overrides_first => flavor.override_order == OverrideOrder::GeneratorWinsOnKey,
        query => query,
        mutation => mutation,
    })?;

    let is_query = op.method.is_query();
    let exports = if is_query {
        vec![
            names.args_type.clone(),
            names.query_key.clone(),
            names.query_overrides.clone(),
            names.query_options.clone(),
            wrapper,
        ]
    } else {
        vec![
            names.variables_type.clone(),
            names.mutation_key.clone(),
            names.mutation_overrides.clone(),
            names.mutation_options.clone(),
            wrapper,
        ]
    };

    let input_helper = if !is_query || op.request_body.is_some() {
        "RouteInput"
    } else {
        "RouteParams"
    };

    Ok(OperationBinding {
        source: op.source.clone(),
        exports,
        code: code.trim_end().to_string(),
        values: vec![set.function],
        types: vec![set.options_type],
        route_helpers: vec![input_helper, "RouteSuccess"],
        uses_build_url: is_query && flavor.key_shape == KeyShape::ResolvedUrlString,
    })
}

fn query_ctx(op: &Operation, names: &NameFamily, flavor: &FlavorConfig, route: &str) -> Value {
    let set = &flavor.query;
    let data = format!("RouteSuccess<{route}>");
    let p = flavor.cancellation_param;

    // A GET that declares a body keys and fetches on the whole input.
    let whole_input = op.request_body.is_some();
    let args_type = if whole_input {
        format!("RouteInput<{route}>")
    } else {
        format!("RouteParams<{route}>")
    };
    let args_param = if op.has_required_input {
        format!("args: {}", names.args_type)
    } else {
        format!("args: {} = {{}}", names.args_type)
    };
    let input = if whole_input {
        "args".to_string()
    } else {
        "{ params: args, body: undefined }".to_string()
    };
    let request = format!(
        "client.request({}, {}, {input}, {{ {p} }})",
        ts_string(op.method.as_lower()),
        ts_string(&op.path)
    );

    let (fetch, destructure, spread) = match flavor.signal_source {
        SignalSource::PrimitiveContext => (
            format!("({{ {p} }}: {{ {p}: AbortSignal }}) => {request}"),
            None,
            "overrides",
        ),
        SignalSource::Overrides => (
            format!("() => {request}"),
            Some(format!("const {{ {p}, ...config }} = overrides;")),
            "config",
        ),
    };

    let inner = match flavor.generics {
        OptionGenerics::TanStack => format!(
            "{}<{data}, Error, {data}, ReturnType<typeof {}>>",
            set.options_type.name, names.query_key
        ),
        OptionGenerics::Swr => format!("{}<{data}, Error>", set.options_type.name),
    };
    let mut overrides_type = restrict(inner, set, flavor.override_order);
    if flavor.signal_source == SignalSource::Overrides {
        overrides_type.push_str(&format!(" & {{ {p}?: AbortSignal }}"));
    }

    context! {
        args_type => args_type,
        args_param => args_param,
        key => query_key(op, flavor.key_shape, whole_input),
        overrides_type => overrides_type,
        destructure => destructure,
        spread => spread,
        key_field => set.key_field,
        fetch_field => set.fetch_field,
        fetch => fetch,
        call => call(set, flavor.call_style),
        result => result(set, flavor.result_style),
    }
}

fn mutation_ctx(op: &Operation, names: &NameFamily, flavor: &FlavorConfig, route: &str) -> Value {
    let set = &flavor.mutation;
    let data = format!("RouteSuccess<{route}>");
    let variables = &names.variables_type;

    let variables_type = if op.has_required_input {
        format!("RouteInput<{route}>")
    } else {
        format!("RouteInput<{route}> | void")
    };
    let input = if op.has_required_input {
        "variables".to_string()
    } else {
        format!(
            "{{ params: {{}}, body: undefined, ...(variables as RouteInput<{route}> | undefined) }}"
        )
    };
    let request = format!(
        "client.request({}, {}, {input})",
        ts_string(op.method.as_lower()),
        ts_string(&op.path)
    );
    let fetch = match flavor.mutation_arg {
        MutationArg::Variables => format!("(variables: {variables}) => {request}"),
        MutationArg::KeyThenArg => {
            format!("(_key: string, {{ arg: variables }}: {{ arg: {variables} }}) => {request}")
        }
    };

    let inner = match flavor.generics {
        OptionGenerics::TanStack => {
            format!("{}<{data}, Error, {variables}>", set.options_type.name)
        }
        OptionGenerics::Swr => {
            format!("{}<{data}, Error, string, {variables}>", set.options_type.name)
        }
    };

    context! {
        variables_type => variables_type,
        key => mutation_key(op, flavor.key_shape),
        overrides_type => restrict(inner, set, flavor.override_order),
        key_field => set.key_field,
        fetch_field => set.fetch_field,
        fetch => fetch,
        call => call(set, flavor.call_style),
        result => result(set, flavor.result_style),
    }
}

/// Hide the generated fields from the override type when they cannot be replaced.
fn restrict(inner: String, set: &PrimitiveSet, order: OverrideOrder) -> String {
    match order {
        OverrideOrder::GeneratorWinsOnKey => format!(
            "Omit<{inner}, {} | {}>",
            ts_string(set.key_field),
            ts_string(set.fetch_field)
        ),
        OverrideOrder::UserWins => inner,
    }
}

/// Literal path segments, placeholders included as written.
fn path_tokens(path: &str) -> impl Iterator<Item = String> + '_ {
    path.split('/').filter(|s| !s.is_empty()).map(ts_string)
}

/// Query key expression built only from literals and `args`.
///
/// With `with_body`, `args` is the whole `{ params, body }` input and the body
/// is part of the key; the URL form pairs the resolved URL with the body.
pub fn query_key(op: &Operation, shape: KeyShape, with_body: bool) -> String {
    match shape {
        KeyShape::FlatLiteralArray => {
            let mut parts: Vec<String> = path_tokens(&op.path).collect();
            parts.push("args".to_string());
            format!("[{}] as const", parts.join(", "))
        }
        KeyShape::PrefixedMethodPathTuple => format!(
            "[{}, {}, args] as const",
            ts_string(op.method.as_lower()),
            ts_string(&op.path)
        ),
        KeyShape::ResolvedUrlString if with_body => format!(
            "[buildUrl({}, args.params), args.body] as const",
            ts_string(&op.path)
        ),
        KeyShape::ResolvedUrlString => format!("buildUrl({}, args)", ts_string(&op.path)),
    }
}

/// Mutation key expression; constant per operation.
pub fn mutation_key(op: &Operation, shape: KeyShape) -> String {
    match shape {
        KeyShape::FlatLiteralArray => {
            let mut parts: Vec<String> = path_tokens(&op.path).collect();
            parts.push(ts_string(op.method.as_lower()));
            format!("[{}] as const", parts.join(", "))
        }
        KeyShape::PrefixedMethodPathTuple => format!(
            "[{}, {}] as const",
            ts_string(op.method.as_lower()),
            ts_string(&op.path)
        ),
        KeyShape::ResolvedUrlString => ts_string(&op.route_key()),
    }
}

fn call(set: &PrimitiveSet, style: CallStyle) -> String {
    let f = set.function.name;
    match style {
        CallStyle::Direct => format!("{f}(options)"),
        CallStyle::Thunk => format!("{f}(() => options)"),
        CallStyle::Positional => format!(
            "{f}(options.{}, options.{}, options)",
            set.key_field, set.fetch_field
        ),
    }
}

fn result(set: &PrimitiveSet, style: ResultStyle) -> String {
    let key = set.key_field;
    match style {
        ResultStyle::Spread => format!("{{ ...result, {key}: options.{key} }}"),
        ResultStyle::Attach => format!("Object.assign(result, {{ {key}: options.{key} }})"),
    }
}
