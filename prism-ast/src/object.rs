/// Built-in opaque object categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Null,
    String,
    Sampler,
    Sampler1D,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    SamplerComparison,
    Texture,
    Texture1D,
    Texture1DArray,
    Texture2D,
    Texture2DArray,
    Texture2DMS,
    Texture2DMSArray,
    Texture3D,
    TextureCube,
    TextureCubeArray,
    RwTexture1D,
    RwTexture1DArray,
    RwTexture2D,
    RwTexture2DArray,
    RwTexture3D,
    Buffer,
    RwBuffer,
    ByteAddressBuffer,
    RwByteAddressBuffer,
    StructuredBuffer,
    RwStructuredBuffer,
    AppendStructuredBuffer,
    ConsumeStructuredBuffer,
    ConstantBuffer,
    TextureBuffer,
    InputPatch,
    OutputPatch,
    PointStream,
    LineStream,
    TriangleStream,
    RasterizerState,
    DepthStencilState,
    BlendState,
    StateBlock,
    RayDesc,
    AccelerationStructure,
    RayQuery,
    /// Placeholder for "any user struct" parameters; never spelled in source.
    UserDefinedType,
}

impl ObjectKind {
    pub const ALL: &'static [ObjectKind] = &[
        ObjectKind::Null,
        ObjectKind::String,
        ObjectKind::Sampler,
        ObjectKind::Sampler1D,
        ObjectKind::Sampler2D,
        ObjectKind::Sampler3D,
        ObjectKind::SamplerCube,
        ObjectKind::SamplerComparison,
        ObjectKind::Texture,
        ObjectKind::Texture1D,
        ObjectKind::Texture1DArray,
        ObjectKind::Texture2D,
        ObjectKind::Texture2DArray,
        ObjectKind::Texture2DMS,
        ObjectKind::Texture2DMSArray,
        ObjectKind::Texture3D,
        ObjectKind::TextureCube,
        ObjectKind::TextureCubeArray,
        ObjectKind::RwTexture1D,
        ObjectKind::RwTexture1DArray,
        ObjectKind::RwTexture2D,
        ObjectKind::RwTexture2DArray,
        ObjectKind::RwTexture3D,
        ObjectKind::Buffer,
        ObjectKind::RwBuffer,
        ObjectKind::ByteAddressBuffer,
        ObjectKind::RwByteAddressBuffer,
        ObjectKind::StructuredBuffer,
        ObjectKind::RwStructuredBuffer,
        ObjectKind::AppendStructuredBuffer,
        ObjectKind::ConsumeStructuredBuffer,
        ObjectKind::ConstantBuffer,
        ObjectKind::TextureBuffer,
        ObjectKind::InputPatch,
        ObjectKind::OutputPatch,
        ObjectKind::PointStream,
        ObjectKind::LineStream,
        ObjectKind::TriangleStream,
        ObjectKind::RasterizerState,
        ObjectKind::DepthStencilState,
        ObjectKind::BlendState,
        ObjectKind::StateBlock,
        ObjectKind::RayDesc,
        ObjectKind::AccelerationStructure,
        ObjectKind::RayQuery,
        ObjectKind::UserDefinedType,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Null => "NULL",
            ObjectKind::String => "string",
            ObjectKind::Sampler => "SamplerState",
            ObjectKind::Sampler1D => "sampler1D",
            ObjectKind::Sampler2D => "sampler2D",
            ObjectKind::Sampler3D => "sampler3D",
            ObjectKind::SamplerCube => "samplerCUBE",
            ObjectKind::SamplerComparison => "SamplerComparisonState",
            ObjectKind::Texture => "texture",
            ObjectKind::Texture1D => "Texture1D",
            ObjectKind::Texture1DArray => "Texture1DArray",
            ObjectKind::Texture2D => "Texture2D",
            ObjectKind::Texture2DArray => "Texture2DArray",
            ObjectKind::Texture2DMS => "Texture2DMS",
            ObjectKind::Texture2DMSArray => "Texture2DMSArray",
            ObjectKind::Texture3D => "Texture3D",
            ObjectKind::TextureCube => "TextureCube",
            ObjectKind::TextureCubeArray => "TextureCubeArray",
            ObjectKind::RwTexture1D => "RWTexture1D",
            ObjectKind::RwTexture1DArray => "RWTexture1DArray",
            ObjectKind::RwTexture2D => "RWTexture2D",
            ObjectKind::RwTexture2DArray => "RWTexture2DArray",
            ObjectKind::RwTexture3D => "RWTexture3D",
            ObjectKind::Buffer => "Buffer",
            ObjectKind::RwBuffer => "RWBuffer",
            ObjectKind::ByteAddressBuffer => "ByteAddressBuffer",
            ObjectKind::RwByteAddressBuffer => "RWByteAddressBuffer",
            ObjectKind::StructuredBuffer => "StructuredBuffer",
            ObjectKind::RwStructuredBuffer => "RWStructuredBuffer",
            ObjectKind::AppendStructuredBuffer => "AppendStructuredBuffer",
            ObjectKind::ConsumeStructuredBuffer => "ConsumeStructuredBuffer",
            ObjectKind::ConstantBuffer => "ConstantBuffer",
            ObjectKind::TextureBuffer => "TextureBuffer",
            ObjectKind::InputPatch => "InputPatch",
            ObjectKind::OutputPatch => "OutputPatch",
            ObjectKind::PointStream => "PointStream",
            ObjectKind::LineStream => "LineStream",
            ObjectKind::TriangleStream => "TriangleStream",
            ObjectKind::RasterizerState => "RasterizerState",
            ObjectKind::DepthStencilState => "DepthStencilState",
            ObjectKind::BlendState => "BlendState",
            ObjectKind::StateBlock => "StateBlock",
            ObjectKind::RayDesc => "RayDesc",
            ObjectKind::AccelerationStructure => "RaytracingAccelerationStructure",
            ObjectKind::RayQuery => "RayQuery",
            ObjectKind::UserDefinedType => "<user defined type>",
        }
    }

    /// Looks up an object category by its source spelling.
    ///
    /// `RayDesc` is declared as a built-in struct rather than spelled as an
    /// object, and the user-defined-type marker has no spelling at all.
    pub fn from_name(name: &str) -> Option<Self> {
        let legacy = match name {
            "sampler" | "SamplerState" => Some(ObjectKind::Sampler),
            "sampler_state" => Some(ObjectKind::StateBlock),
            _ => None,
        };
        legacy.or_else(|| {
            Self::ALL.iter().copied().find(|k| {
                !matches!(k, ObjectKind::RayDesc | ObjectKind::UserDefinedType | ObjectKind::Null)
                    && k.name() == name
            })
        })
    }

    /// Whether the object is declared with a `<T>` element type.
    pub fn takes_element(self) -> bool {
        matches!(
            self,
            ObjectKind::Texture1D
                | ObjectKind::Texture1DArray
                | ObjectKind::Texture2D
                | ObjectKind::Texture2DArray
                | ObjectKind::Texture2DMS
                | ObjectKind::Texture2DMSArray
                | ObjectKind::Texture3D
                | ObjectKind::TextureCube
                | ObjectKind::TextureCubeArray
                | ObjectKind::RwTexture1D
                | ObjectKind::RwTexture1DArray
                | ObjectKind::RwTexture2D
                | ObjectKind::RwTexture2DArray
                | ObjectKind::RwTexture3D
                | ObjectKind::Buffer
                | ObjectKind::RwBuffer
                | ObjectKind::StructuredBuffer
                | ObjectKind::RwStructuredBuffer
                | ObjectKind::AppendStructuredBuffer
                | ObjectKind::ConsumeStructuredBuffer
                | ObjectKind::ConstantBuffer
                | ObjectKind::TextureBuffer
                | ObjectKind::InputPatch
                | ObjectKind::OutputPatch
                | ObjectKind::PointStream
                | ObjectKind::LineStream
                | ObjectKind::TriangleStream
        )
    }

    /// Element type is defaulted to `float4` when omitted (`Texture2D tex;`).
    pub fn defaults_to_float4(self) -> bool {
        self.takes_element()
            && !matches!(
                self,
                ObjectKind::StructuredBuffer
                    | ObjectKind::RwStructuredBuffer
                    | ObjectKind::AppendStructuredBuffer
                    | ObjectKind::ConsumeStructuredBuffer
                    | ObjectKind::ConstantBuffer
                    | ObjectKind::TextureBuffer
                    | ObjectKind::InputPatch
                    | ObjectKind::OutputPatch
                    | ObjectKind::PointStream
                    | ObjectKind::LineStream
                    | ObjectKind::TriangleStream
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_round_trip_for_spellable_objects() {
        for kind in ObjectKind::ALL {
            if matches!(
                kind,
                ObjectKind::RayDesc | ObjectKind::UserDefinedType | ObjectKind::Null
            ) {
                assert_ne!(ObjectKind::from_name(kind.name()), Some(*kind));
                continue;
            }
            assert_eq!(ObjectKind::from_name(kind.name()), Some(*kind), "{kind:?}");
        }
    }

    #[test]
    fn legacy_sampler_spellings() {
        assert_eq!(ObjectKind::from_name("sampler"), Some(ObjectKind::Sampler));
        assert_eq!(
            ObjectKind::from_name("sampler_state"),
            Some(ObjectKind::StateBlock)
        );
    }
}
