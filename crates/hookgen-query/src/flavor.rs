//! Flavor descriptors.
//!
//! Every target library is described by one constant [`FlavorConfig`]; the
//! emitters read nothing else, so adding a library means adding a table entry.

use hookgen_core::config::FlavorId;

/// How cache keys are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    /// `["products", "{id}", args] as const`
    FlatLiteralArray,
    /// `["get", "/products/{id}", args] as const`
    PrefixedMethodPathTuple,
    /// `buildUrl("/products/{id}", args)`
    ResolvedUrlString,
}

/// Where caller overrides land relative to the generated key and fetch fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideOrder {
    /// Overrides first, so the generated key and fetch closure cannot be replaced.
    GeneratorWinsOnKey,
    /// Overrides last.
    UserWins,
}

/// Where the query fetch closure gets its abort signal from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    /// The primitive passes a context object carrying the signal.
    PrimitiveContext,
    /// The primitive has no signal; callers pass one in the overrides.
    Overrides,
}

/// How the primitive receives the option object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStyle {
    /// `useQuery(options)`
    Direct,
    /// `createQuery(() => options)`
    Thunk,
    /// `useSWR(options.key, options.fetcher, options)`
    Positional,
}

/// How the wrapper re-exposes the computed key next to the primitive's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStyle {
    /// `{ ...result, queryKey }`
    Spread,
    /// `Object.assign(result, { queryKey })`, keeping reactive results intact.
    Attach,
}

/// How a mutation fetch closure receives its variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationArg {
    /// `(variables) => ...`
    Variables,
    /// `(key, { arg }) => ...`
    KeyThenArg,
}

/// Generic parameters of the library's option types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionGenerics {
    /// `Options<TQueryFnData, TError, TData, TQueryKey>` and
    /// `MutationOptions<TData, TError, TVariables>`.
    TanStack,
    /// `SWRConfiguration<TData, TError>` and
    /// `SWRMutationConfiguration<TData, TError, TKey, TArg>`.
    Swr,
}

/// An importable symbol of the target library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    pub name: &'static str,
    pub module: &'static str,
    pub default_export: bool,
}

impl Primitive {
    const fn named(name: &'static str, module: &'static str) -> Self {
        Self {
            name,
            module,
            default_export: false,
        }
    }

    const fn default_of(name: &'static str, module: &'static str) -> Self {
        Self {
            name,
            module,
            default_export: true,
        }
    }
}

/// The primitive function and its option type for one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveSet {
    pub function: Primitive,
    pub options_type: Primitive,
    /// Option field holding the cache key.
    pub key_field: &'static str,
    /// Option field holding the fetch closure.
    pub fetch_field: &'static str,
}

/// Everything the emitters need to know about one target library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlavorConfig {
    pub id: FlavorId,
    pub key_shape: KeyShape,
    pub supports_query: bool,
    pub supports_mutation: bool,
    pub override_order: OverrideOrder,
    /// Request-init field the abort signal is forwarded under.
    pub cancellation_param: &'static str,
    pub signal_source: SignalSource,
    /// `use` or `create`.
    pub wrapper_prefix: &'static str,
    pub query: PrimitiveSet,
    pub mutation: PrimitiveSet,
    pub generics: OptionGenerics,
    pub call_style: CallStyle,
    pub result_style: ResultStyle,
    pub mutation_arg: MutationArg,
}

const fn tanstack(
    module: &'static str,
    function_prefix: Prefix,
) -> (PrimitiveSet, PrimitiveSet) {
    let (query_fn, query_opts, mutation_fn, mutation_opts) = match function_prefix {
        Prefix::Use => (
            "useQuery",
            "UseQueryOptions",
            "useMutation",
            "UseMutationOptions",
        ),
        Prefix::Create => (
            "createQuery",
            "CreateQueryOptions",
            "createMutation",
            "CreateMutationOptions",
        ),
        Prefix::Solid => (
            "createQuery",
            "SolidQueryOptions",
            "createMutation",
            "SolidMutationOptions",
        ),
    };
    (
        PrimitiveSet {
            function: Primitive::named(query_fn, module),
            options_type: Primitive::named(query_opts, module),
            key_field: "queryKey",
            fetch_field: "queryFn",
        },
        PrimitiveSet {
            function: Primitive::named(mutation_fn, module),
            options_type: Primitive::named(mutation_opts, module),
            key_field: "mutationKey",
            fetch_field: "mutationFn",
        },
    )
}

enum Prefix {
    Use,
    Create,
    Solid,
}

const REACT_PRIMITIVES: (PrimitiveSet, PrimitiveSet) =
    tanstack("@tanstack/react-query", Prefix::Use);
const VUE_PRIMITIVES: (PrimitiveSet, PrimitiveSet) = tanstack("@tanstack/vue-query", Prefix::Use);
const SVELTE_PRIMITIVES: (PrimitiveSet, PrimitiveSet) =
    tanstack("@tanstack/svelte-query", Prefix::Create);
const SOLID_PRIMITIVES: (PrimitiveSet, PrimitiveSet) =
    tanstack("@tanstack/solid-query", Prefix::Solid);

pub const REACT_QUERY: FlavorConfig = FlavorConfig {
    id: FlavorId::ReactQuery,
    key_shape: KeyShape::FlatLiteralArray,
    supports_query: true,
    supports_mutation: true,
    override_order: OverrideOrder::GeneratorWinsOnKey,
    cancellation_param: "signal",
    signal_source: SignalSource::PrimitiveContext,
    wrapper_prefix: "use",
    query: REACT_PRIMITIVES.0,
    mutation: REACT_PRIMITIVES.1,
    generics: OptionGenerics::TanStack,
    call_style: CallStyle::Direct,
    result_style: ResultStyle::Spread,
    mutation_arg: MutationArg::Variables,
};

pub const VUE_QUERY: FlavorConfig = FlavorConfig {
    id: FlavorId::VueQuery,
    query: VUE_PRIMITIVES.0,
    mutation: VUE_PRIMITIVES.1,
    ..REACT_QUERY
};

pub const SVELTE_QUERY: FlavorConfig = FlavorConfig {
    id: FlavorId::SvelteQuery,
    key_shape: KeyShape::PrefixedMethodPathTuple,
    wrapper_prefix: "create",
    query: SVELTE_PRIMITIVES.0,
    mutation: SVELTE_PRIMITIVES.1,
    result_style: ResultStyle::Attach,
    ..REACT_QUERY
};

pub const SOLID_QUERY: FlavorConfig = FlavorConfig {
    id: FlavorId::SolidQuery,
    key_shape: KeyShape::PrefixedMethodPathTuple,
    wrapper_prefix: "create",
    query: SOLID_PRIMITIVES.0,
    mutation: SOLID_PRIMITIVES.1,
    call_style: CallStyle::Thunk,
    result_style: ResultStyle::Attach,
    ..REACT_QUERY
};

pub const SWR: FlavorConfig = FlavorConfig {
    id: FlavorId::Swr,
    key_shape: KeyShape::ResolvedUrlString,
    supports_query: true,
    supports_mutation: true,
    override_order: OverrideOrder::UserWins,
    cancellation_param: "signal",
    signal_source: SignalSource::Overrides,
    wrapper_prefix: "use",
    query: PrimitiveSet {
        function: Primitive::default_of("useSWR", "swr"),
        options_type: Primitive::named("SWRConfiguration", "swr"),
        key_field: "key",
        fetch_field: "fetcher",
    },
    mutation: PrimitiveSet {
        function: Primitive::default_of("useSWRMutation", "swr/mutation"),
        options_type: Primitive::named("SWRMutationConfiguration", "swr/mutation"),
        key_field: "key",
        fetch_field: "fetcher",
    },
    generics: OptionGenerics::Swr,
    call_style: CallStyle::Positional,
    result_style: ResultStyle::Spread,
    mutation_arg: MutationArg::KeyThenArg,
};

/// Every descriptor, in [`FlavorId::ALL`] order.
pub const FLAVORS: [&FlavorConfig; 5] = [&REACT_QUERY, &VUE_QUERY, &SVELTE_QUERY, &SOLID_QUERY, &SWR];

/// The descriptor for a configured flavor.
pub fn flavor(id: FlavorId) -> &'static FlavorConfig {
    match id {
        FlavorId::ReactQuery => &REACT_QUERY,
        FlavorId::VueQuery => &VUE_QUERY,
        FlavorId::SvelteQuery => &SVELTE_QUERY,
        FlavorId::SolidQuery => &SOLID_QUERY,
        FlavorId::Swr => &SWR,
    }
}

impl FlavorConfig {
    /// Output directory of this flavor's modules.
    pub fn dir(&self) -> &'static str {
        self.id.as_str()
    }
}
