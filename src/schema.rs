table! {
    beer (id) {
        id -> Int8,
        name -> Varchar,
        abv -> Float8,
        #[sql_name = "type"]
        beer_type -> Varchar,
        description -> Nullable<Varchar>,
        manufacturer_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    manufacturer (id) {
        id -> Int8,
        name -> Varchar,
        country -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    app_user (id) {
        id -> Int8,
        username -> Varchar,
        password_hash -> Varchar,
        role -> Nullable<Varchar>,
        manufacturer_id -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

joinable!(beer -> manufacturer (manufacturer_id));
joinable!(app_user -> manufacturer (manufacturer_id));

allow_tables_to_appear_in_same_query!(app_user, beer, manufacturer,);
