diesel::table! {
    video (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        public_id -> Varchar,
        original_size -> BigInt,
        compressed_size -> BigInt,
        duration -> Double,
        created_at -> Timestamptz,
    }
}
